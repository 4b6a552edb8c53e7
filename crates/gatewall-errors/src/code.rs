use crate::{kind::ErrorKind, retry::RetryClass, severity::Severity};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub &'static str);

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ErrorCode(Box::leak(s.into_boxed_str())))
    }
}

#[derive(Clone, Debug)]
pub struct CodeSpec {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub retryable: RetryClass,
    pub severity: Severity,
    pub default_user_msg: &'static str,
}

pub mod codes {
    use super::ErrorCode;

    // Denial codes: the wire contract, one per denial cause.
    pub const LICENSE_REQUIRED: ErrorCode = ErrorCode("LICENSE_REQUIRED");
    pub const LICENSE_NOT_FOUND: ErrorCode = ErrorCode("LICENSE_NOT_FOUND");
    pub const IP_BLOCKED: ErrorCode = ErrorCode("IP_BLOCKED");
    pub const HWID_MISMATCH: ErrorCode = ErrorCode("HWID_MISMATCH");
    pub const LICENSE_EXPIRED: ErrorCode = ErrorCode("LICENSE_EXPIRED");
    pub const REQUEST_LIMIT_EXCEEDED: ErrorCode = ErrorCode("REQUEST_LIMIT_EXCEEDED");
    pub const RATE_LIMIT_EXCEEDED: ErrorCode = ErrorCode("RATE_LIMIT_EXCEEDED");
    pub const ACCESS_DENIED: ErrorCode = ErrorCode("ACCESS_DENIED");

    // Internal codes: logged, never rendered to callers.
    pub const STORAGE_NOT_FOUND: ErrorCode = ErrorCode("STORAGE_NOT_FOUND");
    pub const STORAGE_CONFLICT: ErrorCode = ErrorCode("STORAGE_CONFLICT");
    pub const STORAGE_UNAVAILABLE: ErrorCode = ErrorCode("STORAGE_UNAVAILABLE");
    pub const INTERNAL: ErrorCode = ErrorCode("INTERNAL");
}

pub static REGISTRY: Lazy<HashMap<&'static str, CodeSpec>> = Lazy::new(|| {
    use codes::*;

    let mut map = HashMap::new();
    let mut add = |spec: CodeSpec| {
        let key = spec.code.0;
        if map.insert(key, spec).is_some() {
            panic!("duplicate error code: {}", key);
        }
    };

    add(CodeSpec {
        code: LICENSE_REQUIRED,
        kind: ErrorKind::Auth,
        http_status: 401,
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "A license key is required.",
    });

    add(CodeSpec {
        code: LICENSE_NOT_FOUND,
        kind: ErrorKind::License,
        http_status: 403,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "License not accepted.",
    });

    add(CodeSpec {
        code: IP_BLOCKED,
        kind: ErrorKind::Blocklist,
        http_status: 403,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Access from this address is blocked.",
    });

    add(CodeSpec {
        code: HWID_MISMATCH,
        kind: ErrorKind::License,
        http_status: 403,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "This license is bound to different hardware.",
    });

    add(CodeSpec {
        code: LICENSE_EXPIRED,
        kind: ErrorKind::License,
        http_status: 403,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "License has expired.",
    });

    add(CodeSpec {
        code: REQUEST_LIMIT_EXCEEDED,
        kind: ErrorKind::Quota,
        http_status: 429,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "License request quota exhausted.",
    });

    add(CodeSpec {
        code: RATE_LIMIT_EXCEEDED,
        kind: ErrorKind::RateLimit,
        http_status: 429,
        retryable: RetryClass::Transient,
        severity: Severity::Warn,
        default_user_msg: "Too many requests. Please retry later.",
    });

    add(CodeSpec {
        code: ACCESS_DENIED,
        kind: ErrorKind::Auth,
        http_status: 403,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Access denied.",
    });

    add(CodeSpec {
        code: STORAGE_NOT_FOUND,
        kind: ErrorKind::Storage,
        http_status: 404,
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "Resource not found.",
    });

    add(CodeSpec {
        code: STORAGE_CONFLICT,
        kind: ErrorKind::Storage,
        http_status: 409,
        retryable: RetryClass::Transient,
        severity: Severity::Warn,
        default_user_msg: "The resource is currently contended. Please retry.",
    });

    add(CodeSpec {
        code: STORAGE_UNAVAILABLE,
        kind: ErrorKind::Storage,
        http_status: 503,
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "Storage backend is unavailable. Please retry later.",
    });

    add(CodeSpec {
        code: INTERNAL,
        kind: ErrorKind::Unknown,
        http_status: 500,
        retryable: RetryClass::Transient,
        severity: Severity::Critical,
        default_user_msg: "Internal error. Please retry later.",
    });

    map
});

pub fn spec_of(code: ErrorCode) -> &'static CodeSpec {
    REGISTRY.get(code.0).expect("unregistered ErrorCode")
}
