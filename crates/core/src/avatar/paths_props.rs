//! Property-based tests for photo path derivation.

use atrium_shared::types::UserId;
use proptest::prelude::*;
use uuid::Uuid;

use super::paths::PhotoPathBuilder;

fn owner_strategy() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|raw| UserId::from_uuid(Uuid::from_u128(raw)))
}

fn category_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,16}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_derivation_is_deterministic(
        name in ".{0,40}",
        owner in owner_strategy(),
        category in category_strategy(),
    ) {
        let builder = PhotoPathBuilder::new("/srv/static");
        let first = builder.build(&name, owner, &category);
        let second = builder.build(&name, owner, &category);

        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "derivation disagreed with itself"),
        }
    }

    #[test]
    fn prop_paths_are_scoped_to_owner(
        name in "[A-Za-z0-9 ._/-]{0,40}[a-z]",
        owner in owner_strategy(),
        category in category_strategy(),
    ) {
        let paths = PhotoPathBuilder::new("/srv/static")
            .build(&name, owner, &category)
            .unwrap();

        let prefix = format!("{category}/{owner}/");
        prop_assert_eq!(&paths.upload_dir, &prefix);
        prop_assert!(paths.db_path.starts_with(&prefix));
        prop_assert!(paths.final_path.starts_with("/srv/static"));
        prop_assert!(paths.final_path.ends_with(&paths.db_path));
    }

    #[test]
    fn prop_file_component_is_safe(
        name in any::<String>(),
        owner in owner_strategy(),
    ) {
        if let Ok(paths) = PhotoPathBuilder::new("/srv").build(&name, owner, "users") {
            let file = &paths.db_path[paths.upload_dir.len()..];
            prop_assert!(!file.is_empty());
            prop_assert!(!file.starts_with('.'));
            prop_assert!(file
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        }
    }

    #[test]
    fn prop_distinct_owners_never_collide(
        name in "[a-z]{1,12}\\.png",
        a in owner_strategy(),
        b in owner_strategy(),
    ) {
        prop_assume!(a != b);
        let builder = PhotoPathBuilder::new("/srv");
        let pa = builder.build(&name, a, "users").unwrap();
        let pb = builder.build(&name, b, "users").unwrap();
        prop_assert_ne!(pa.db_path, pb.db_path);
    }
}
