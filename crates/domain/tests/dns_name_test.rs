use std::collections::HashSet;
use triedns_domain::{DnsName, WireError};

#[test]
fn test_parse_dotted_name() {
    let name: DnsName = "www.example.com".parse().unwrap();
    let labels: Vec<&[u8]> = name.labels().collect();

    assert_eq!(labels, vec![&b"www"[..], b"example", b"com"]);
    assert_eq!(name.label_count(), 3);
    assert_eq!(name.encoded_len(), 17);
    assert_eq!(name.to_string(), "www.example.com");
}

#[test]
fn test_trailing_dot_is_ignored() {
    let a: DnsName = "example.com.".parse().unwrap();
    let b: DnsName = "example.com".parse().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_root_name() {
    let root: DnsName = ".".parse().unwrap();
    assert!(root.is_root());
    assert_eq!(root.encoded_len(), 1);
    assert_eq!(root.to_string(), ".");
    assert_eq!(root, DnsName::root());
}

#[test]
fn test_equality_and_hash_fold_case() {
    let upper: DnsName = "WWW.Example.COM".parse().unwrap();
    let lower: DnsName = "www.example.com".parse().unwrap();
    assert_eq!(upper, lower);

    let mut set = HashSet::new();
    set.insert(upper.clone());
    assert!(set.contains(&lower));

    // display keeps the original spelling
    assert_eq!(upper.to_string(), "WWW.Example.COM");
}

#[test]
fn test_label_too_long() {
    let name = format!("{}.com", "a".repeat(64));
    assert_eq!(
        name.parse::<DnsName>().unwrap_err(),
        WireError::LabelTooLong(64)
    );
}

#[test]
fn test_name_too_long() {
    let label = "a".repeat(63);
    let name = vec![label.as_str(); 4].join(".");
    assert_eq!(name.parse::<DnsName>().unwrap_err(), WireError::NameTooLong);

    let fits = vec![label.as_str(); 3].join(".");
    assert!(fits.parse::<DnsName>().is_ok());
}

#[test]
fn test_empty_label_rejected() {
    assert!(matches!(
        "www..com".parse::<DnsName>(),
        Err(WireError::InvalidLabel(_))
    ));
}

#[test]
fn test_is_subdomain_of() {
    let zone: DnsName = "example.com".parse().unwrap();
    let inside: DnsName = "a.b.EXAMPLE.com".parse().unwrap();
    let outside: DnsName = "example.org".parse().unwrap();

    assert!(inside.is_subdomain_of(&zone));
    assert!(zone.is_subdomain_of(&zone));
    assert!(!outside.is_subdomain_of(&zone));
    assert!(!zone.is_subdomain_of(&inside));
    assert!(zone.is_subdomain_of(&DnsName::root()));
}

#[test]
fn test_wire_labels_accept_any_octet() {
    let name =
        DnsName::from_wire_labels([&b"my printer"[..], b"a.b", b"\x07\xff", b"local"]).unwrap();

    assert_eq!(name.label_count(), 4);
    assert_eq!(name.to_string(), "my\\032printer.a\\.b.\\007\\255.local");
}

#[test]
fn test_escaped_text_parses_back_to_the_same_octets() {
    let wire = DnsName::from_wire_labels([&b"my printer"[..], b"a.b", b"local"]).unwrap();
    let text: DnsName = wire.to_string().parse().unwrap();

    assert_eq!(text, wire);
    let labels: Vec<&[u8]> = text.labels().collect();
    assert_eq!(labels[1], b"a.b");
}

#[test]
fn test_text_rejects_unescaped_whitespace() {
    assert!(matches!(
        "my printer.local".parse::<DnsName>(),
        Err(WireError::InvalidLabel(_))
    ));
    assert!("my\\032printer.local".parse::<DnsName>().is_ok());
}

#[test]
fn test_wire_label_limits_still_apply() {
    let long = [0x41u8; 64];
    assert_eq!(
        DnsName::from_wire_labels([&long[..]]).unwrap_err(),
        WireError::LabelTooLong(64)
    );
}
