/// Language of the widget's fixed texts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Korean,
    English,
}

impl Locale {
    /// Parses a `data-lang` value such as `ko`, `ko-KR` or `en`.
    pub fn parse(value: &str) -> Option<Self> {
        let primary = value.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "ko" | "kr" => Some(Locale::Korean),
            "en" => Some(Locale::English),
            _ => None,
        }
    }

    pub fn html_lang(&self) -> &'static str {
        match self {
            Locale::Korean => "ko",
            Locale::English => "en",
        }
    }
}

/// Every fixed, user-facing text of the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub greeting: &'static str,
    pub placeholder: &'static str,
    pub send: &'static str,
    pub open_chat: &'static str,
    pub close_chat: &'static str,
    pub refresh: &'static str,
    pub typing: &'static str,
    pub rate_limited: &'static str,
    pub request_failed: &'static str,
}

const KOREAN: Strings = Strings {
    title: "민토봇 🌧️",
    subtitle: "두온교육 출판사 AI 어시스턴트",
    greeting: "안녕하세요! 민토봇 🌧️이에요.\n두온교육 출판사의 도서, 교육 프로그램, 출판 과정에 대해 무엇이든 물어보세요!",
    placeholder: "메시지를 입력하세요...",
    send: "전송",
    open_chat: "채팅 열기",
    close_chat: "채팅 닫기",
    refresh: "새 대화",
    typing: "답변을 작성하고 있어요",
    rate_limited: "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.",
    request_failed: "죄송합니다, 일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요.",
};

const ENGLISH: Strings = Strings {
    title: "Mintobot 🌧️",
    subtitle: "Duon Education Publishing AI assistant",
    greeting: "Hello! I'm Mintobot 🌧️.\nAsk me anything about our books, courses or the publishing process!",
    placeholder: "Type a message...",
    send: "Send",
    open_chat: "Open chat",
    close_chat: "Close chat",
    refresh: "New conversation",
    typing: "Writing a reply",
    rate_limited: "Too many requests. Please try again in a moment.",
    request_failed: "Sorry, a temporary error occurred. Please try again shortly.",
};

impl Strings {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Korean => KOREAN,
            Locale::English => ENGLISH,
        }
    }
}
