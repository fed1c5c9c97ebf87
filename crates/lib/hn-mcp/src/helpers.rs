use std::borrow::Cow;

use hn_core::control::DispatchError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn map_dispatch_err(err: DispatchError) -> ErrorData {
    let code = match &err {
        DispatchError::MissingArgument(_)
        | DispatchError::InvalidArgument { .. }
        | DispatchError::InvalidIndex { .. }
        | DispatchError::NoSession => ErrorCode::INVALID_PARAMS,
        DispatchError::NotFound(_) => ErrorCode::RESOURCE_NOT_FOUND,
        DispatchError::UnknownOperation(_) => ErrorCode::METHOD_NOT_FOUND,
    };
    mcp_err(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_are_invalid_params() {
        let err = map_dispatch_err(DispatchError::InvalidIndex {
            index: 4,
            available: 2,
        });
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(
            err.message,
            "invalid story index 4: the last story list has 2 entries"
        );
    }

    #[test]
    fn missing_items_are_not_found() {
        let err = map_dispatch_err(DispatchError::NotFound(12));
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert_eq!(err.message, "story 12 not found");
    }

    #[test]
    fn unknown_operations_name_the_operation() {
        let err = map_dispatch_err(DispatchError::UnknownOperation("vote".to_string()));
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("vote"));
    }
}
