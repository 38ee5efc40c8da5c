use crate::i18n::Locale;
use crate::models::QuickAction;

const KOREAN: &[QuickAction] = &[
    QuickAction { label: "📚 도서 안내", prompt: "어떤 도서를 출판하나요?" },
    QuickAction { label: "🎓 교육 문의", prompt: "어떤 교육 프로그램이 있나요?" },
    QuickAction { label: "🤖 AI 활용", prompt: "생성형 AI를 어떻게 활용할 수 있나요?" },
    QuickAction { label: "✍️ 원고 투고", prompt: "원고 투고는 어떻게 하나요?" },
];

const ENGLISH: &[QuickAction] = &[
    QuickAction { label: "📚 Books", prompt: "What books do you publish?" },
    QuickAction { label: "🎓 Courses", prompt: "What education programs do you offer?" },
    QuickAction { label: "🤖 Using AI", prompt: "How can I make use of generative AI?" },
    QuickAction { label: "✍️ Submissions", prompt: "How do I submit a manuscript?" },
];

/// The static, ordered quick-action catalog for a locale.
pub fn catalog(locale: Locale) -> &'static [QuickAction] {
    match locale {
        Locale::Korean => KOREAN,
        Locale::English => ENGLISH,
    }
}
