//! Property tests for remote path joining.

use proptest::prelude::*;

use sitepush::infrastructure::deployers::remote_path;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Remote paths only use `/` and never double it.
    #[test]
    fn property_remote_path_uses_single_forward_slashes(
        root in proptest::collection::vec(segment(), 1..=3),
        relative in proptest::collection::vec(segment(), 1..=3),
    ) {
        let root = format!("/{}", root.join("/"));
        let joined = remote_path(&root, &relative.join("\\"));

        prop_assert!(!joined.contains('\\'));
        prop_assert!(!joined.contains("//"));
        prop_assert_eq!(joined, format!("{}/{}", root, relative.join("/")));
    }
}
