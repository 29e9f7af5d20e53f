use oasgen_core::{generate_client, GeneratorOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_checked_in_client_matches_generator() {
    let source = include_str!("../openapi.yaml");
    let expected = include_str!("../src/generated.rs");

    let code = generate_client(source, &GeneratorOptions::default()).unwrap();
    assert_eq!(code, expected);
}
