use proptest::prelude::*;
use schema::{ActionCode, ErrorCode, Registry, RequestKind, ResponseStatus};

proptest! {
    #[test]
    fn request_code_name_inverse(index in 0..RequestKind::ALL.len()) {
        let registry = Registry::shared();
        let kind = RequestKind::ALL[index];
        let name = registry.request_name_for(kind.code()).unwrap();
        prop_assert_eq!(registry.request_code_for(name).unwrap(), kind.code());
    }

    #[test]
    fn status_code_name_inverse(index in 0..ResponseStatus::ALL.len()) {
        let registry = Registry::shared();
        let status = ResponseStatus::ALL[index];
        let name = registry.status_name_for(status.code()).unwrap();
        prop_assert_eq!(registry.status_code_for(name).unwrap(), status.code());
    }

    #[test]
    fn action_code_name_inverse(index in 0..ActionCode::ALL.len()) {
        let registry = Registry::shared();
        let action = ActionCode::ALL[index];
        let name = registry.action_name_for(action.code()).unwrap();
        prop_assert_eq!(registry.action_code_for(name).unwrap(), action.code());
    }

    #[test]
    fn error_code_name_inverse(index in 0..ErrorCode::ALL.len()) {
        let registry = Registry::shared();
        let error = ErrorCode::ALL[index];
        let name = registry.error_name_for(error.code()).unwrap();
        prop_assert_eq!(registry.error_code_for(name).unwrap(), error.code());
    }

    #[test]
    fn unknown_request_codes_fail(code in any::<u16>()) {
        let known = RequestKind::ALL.iter().any(|kind| kind.code() == code);
        prop_assert_eq!(RequestKind::from_code(code).is_ok(), known);
    }

    #[test]
    fn unknown_action_codes_fail(code in any::<i32>()) {
        let known = ActionCode::ALL.iter().any(|action| action.code() == code);
        prop_assert_eq!(ActionCode::from_code(code).is_ok(), known);
    }
}

#[test]
fn names_are_unique_per_table() {
    let mut names: Vec<_> = RequestKind::ALL.iter().map(|kind| kind.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), RequestKind::ALL.len());
}
