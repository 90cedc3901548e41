// ABOUTME: Tests for validated value types.
// ABOUTME: ImageRef parsing/normalization and identifier behavior.

use dockhand::types::*;

mod image_ref_tests {
    use super::*;

    #[test]
    fn parse_simple_name_defaults_to_latest() {
        let img = ImageRef::parse("nginx").unwrap();
        assert_eq!(img.repository(), "nginx");
        assert_eq!(img.tag(), Some("latest"));
        assert!(img.digest().is_none());
        assert_eq!(img.to_string(), "nginx:latest");
    }

    #[test]
    fn parse_name_with_tag() {
        let img = ImageRef::parse("nginx:1.25").unwrap();
        assert_eq!(img.repository(), "nginx");
        assert_eq!(img.tag(), Some("1.25"));
        assert_eq!(img.to_string(), "nginx:1.25");
    }

    #[test]
    fn parse_registry_with_port_is_not_a_tag() {
        let img = ImageRef::parse("localhost:5000/myapp").unwrap();
        assert_eq!(img.repository(), "localhost:5000/myapp");
        assert_eq!(img.tag(), Some("latest"));
    }

    #[test]
    fn parse_registry_with_port_and_tag() {
        let img = ImageRef::parse("localhost:5000/myapp:v2").unwrap();
        assert_eq!(img.repository(), "localhost:5000/myapp");
        assert_eq!(img.tag(), Some("v2"));
    }

    #[test]
    fn parse_digest_pinned_reference_stays_untagged() {
        let img = ImageRef::parse("nginx@sha256:abc123").unwrap();
        assert_eq!(img.repository(), "nginx");
        assert!(img.tag().is_none());
        assert_eq!(img.digest(), Some("sha256:abc123"));
        assert_eq!(img.to_string(), "nginx@sha256:abc123");
    }

    #[test]
    fn parse_empty_returns_error() {
        assert!(matches!(
            ImageRef::parse(""),
            Err(ParseImageRefError::Empty)
        ));
        assert!(matches!(
            ImageRef::parse("   "),
            Err(ParseImageRefError::Empty)
        ));
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        assert!(matches!(
            ImageRef::parse("bad image"),
            Err(ParseImageRefError::InvalidChar(' '))
        ));
    }

    #[test]
    fn parse_tag_without_repository_is_empty() {
        assert!(matches!(
            ImageRef::parse(":latest"),
            Err(ParseImageRefError::Empty)
        ));
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn display_and_as_str_agree() {
        let id = ContainerId::new("3a5f9c");
        assert_eq!(id.as_str(), "3a5f9c");
        assert_eq!(id.to_string(), "3a5f9c");
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(ContainerId::new("abc"), ContainerId::new("abc"));
        assert_ne!(ContainerId::new("abc"), ContainerId::new("def"));
    }

    #[test]
    fn into_inner_returns_the_raw_string() {
        assert_eq!(ContainerId::new("abc").into_inner(), "abc");
    }
}
