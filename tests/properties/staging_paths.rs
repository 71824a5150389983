//! Property tests for staging path parsing.

use std::path::{Component, Path};

use proptest::prelude::*;

use sitepush::StagingPath;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._-]{0,15}")
        .unwrap()
        .prop_filter("no dot-only segments", |s| s != "." && s != "..")
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=5)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(raw in "(?s).{0,256}") {
        let _ = StagingPath::parse(&raw);
    }

    /// PROPERTY: An accepted path never carries a traversal segment.
    #[test]
    fn property_accepted_paths_have_no_traversal(raw in "[A-Za-z0-9./\\\\~_-]{0,64}") {
        if let Ok(path) = StagingPath::parse(&raw) {
            prop_assert!(path.segments().iter().all(|s| s != ".." && s != "." && !s.is_empty()));
        }
    }

    /// PROPERTY: Resolving an accepted path stays under the root.
    #[test]
    fn property_resolve_stays_under_root(raw in "[A-Za-z0-9./\\\\~_-]{0,64}") {
        let root = Path::new("/srv/staging/session");
        if let Ok(path) = StagingPath::parse(&raw) {
            let resolved = path.resolve(root);
            prop_assert!(resolved.starts_with(root));
            prop_assert!(resolved.components().all(|c| c != Component::ParentDir));
        }
    }

    /// PROPERTY: `~/`, leading slashes and backslashes all name the same path.
    #[test]
    fn property_prefix_and_separator_forms_agree(segments in relative_path()) {
        let plain = segments.join("/");
        let expected = StagingPath::parse(&plain).unwrap();

        prop_assert_eq!(&StagingPath::parse(&format!("~/{}", plain)).unwrap(), &expected);
        prop_assert_eq!(&StagingPath::parse(&format!("/{}", plain)).unwrap(), &expected);
        prop_assert_eq!(&StagingPath::parse(&segments.join("\\")).unwrap(), &expected);
        prop_assert_eq!(expected.segments(), segments.as_slice());
    }

    /// PROPERTY: Any `..` segment is rejected.
    #[test]
    fn property_traversal_is_rejected(
        head in relative_path(),
        tail in relative_path(),
    ) {
        let raw = format!("{}/../{}", head.join("/"), tail.join("/"));
        prop_assert!(StagingPath::parse(&raw).is_err());
    }
}
