#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    Auth,
    License,
    Blocklist,
    RateLimit,
    Quota,
    Storage,
    Unknown,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Auth => "Auth",
            ErrorKind::License => "License",
            ErrorKind::Blocklist => "Blocklist",
            ErrorKind::RateLimit => "RateLimit",
            ErrorKind::Quota => "Quota",
            ErrorKind::Storage => "Storage",
            ErrorKind::Unknown => "Unknown",
        }
    }
}
