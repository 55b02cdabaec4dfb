//! Assertion macros shared by the integration tests

/// Unwrap an `Ok`, panicking with the error otherwise
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert an `Err` matching a pattern
#[macro_export]
macro_rules! assert_err {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => panic!("Expected different error variant, got: {:?}", e),
        }
    };
}

/// Assert the current notice has the given tone and message
#[macro_export]
macro_rules! assert_notice {
    ($notice:expr, $tone:expr, $message:expr) => {
        match $notice {
            Some(notice) => {
                assert_eq!(notice.tone, $tone, "notice tone for {:?}", notice.message);
                assert_eq!(notice.message, $message);
            }
            None => panic!("Expected a notice saying {:?}, got none", $message),
        }
    };
}
