//! # Configuration Tests
//!
//! Tests for configuration defaults, selector parsing, JSON deserialization
//! and the geometry derived from page size, memory size and address width.

use pagesim_core::SimError;
use pagesim_core::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = SimConfig::default();
    assert_eq!(config.policy, PolicyKind::Fifo);
    assert_eq!(config.page_size, 4096);
    assert_eq!(config.memory_size, 16 * 1024);
    assert_eq!(config.address_bits, 32);
    assert_eq!(config.seed, 1);
    assert_eq!(config.schemes, Scheme::ALL.to_vec());
}

#[test]
fn test_default_geometry() {
    let geometry = SimConfig::default().geometry().unwrap();
    assert_eq!(geometry.page_size.bytes(), 4096);
    assert_eq!(geometry.page_size.shift(), 12);
    assert_eq!(geometry.num_pages, 1 << 20);
    assert_eq!(geometry.num_frames, 4);
    assert_eq!(geometry.l1_bits, 10);
    assert_eq!(geometry.l2_bits, 10);
    assert_eq!(geometry.l1_size(), 1024);
    assert_eq!(geometry.l2_size(), 1024);
}

/// Odd page-number widths give the extra bit to the first level.
#[test]
fn test_geometry_odd_split() {
    let config = SimConfig {
        page_size: 8192,
        ..SimConfig::default()
    };
    let geometry = config.geometry().unwrap();
    assert_eq!(geometry.num_pages, 1 << 19);
    assert_eq!(geometry.l1_bits, 10);
    assert_eq!(geometry.l2_bits, 9);
    assert_eq!(geometry.l1_size() * geometry.l2_size(), geometry.num_pages);
}

#[rstest]
#[case(4, 128, 32)]
#[case(8, 64, 8)]
#[case(2, 2, 1)]
#[case(4, 6, 1)]
fn test_frame_count(#[case] page_kb: u64, #[case] memory_kb: u64, #[case] frames: usize) {
    let config = SimConfig {
        page_size: page_kb * 1024,
        memory_size: memory_kb * 1024,
        ..SimConfig::default()
    };
    assert_eq!(config.geometry().unwrap().num_frames, frames);
}

#[rstest]
#[case::not_power_of_two(3000, 16384, 32)]
#[case::zero_page(0, 16384, 32)]
#[case::memory_below_one_page(4096, 1024, 32)]
#[case::page_wider_than_address(1 << 20, 1 << 22, 16)]
#[case::zero_address_bits(4096, 16384, 0)]
#[case::address_too_wide(4096, 16384, 65)]
fn test_invalid_geometry(#[case] page_size: u64, #[case] memory_size: u64, #[case] bits: u32) {
    let config = SimConfig {
        page_size,
        memory_size,
        address_bits: bits,
        ..SimConfig::default()
    };
    assert!(matches!(config.geometry(), Err(SimError::InvalidConfig(_))));
}

/// A 64-bit address space is fine for the inverted and hierarchical tables
/// but far too large to allocate as a direct table.
#[test]
fn test_oversized_direct_table_rejected() {
    let config = SimConfig {
        address_bits: 64,
        ..SimConfig::default()
    };
    let geometry = config.geometry().unwrap();
    assert_eq!(geometry.num_pages, 1 << 52);
    assert!(matches!(
        geometry.check(Scheme::Direct),
        Err(SimError::InvalidConfig(_))
    ));
    assert_eq!(geometry.l1_size(), 1 << 26);
    assert_eq!(geometry.check(Scheme::Hierarchical), Ok(()));
    assert_eq!(geometry.check(Scheme::Inverted), Ok(()));
}

/// More frames than virtual pages is rejected before anything is allocated.
#[test]
fn test_memory_larger_than_address_space_rejected() {
    let config = SimConfig {
        memory_size: 1 << 62,
        ..SimConfig::default()
    };
    assert!(matches!(config.geometry(), Err(SimError::InvalidConfig(_))));

    // Exactly one frame per page is still a valid machine.
    let config = SimConfig {
        address_bits: 16,
        memory_size: 1 << 16,
        ..SimConfig::default()
    };
    let geometry = config.geometry().unwrap();
    assert_eq!(geometry.num_frames as u64, geometry.num_pages);
}

/// The frame pool counts against the entry limit for every scheme.
#[rstest]
#[case(Scheme::Direct)]
#[case(Scheme::Hierarchical)]
#[case(Scheme::Inverted)]
fn test_oversized_frame_pool_rejected(#[case] scheme: Scheme) {
    let config = SimConfig {
        address_bits: 64,
        memory_size: 1 << 62,
        ..SimConfig::default()
    };
    let geometry = config.geometry().unwrap();
    assert_eq!(geometry.num_frames, 1 << 50);
    assert!(matches!(geometry.check(scheme), Err(SimError::InvalidConfig(_))));
}

#[rstest]
#[case("fifo", PolicyKind::Fifo)]
#[case("FIFO", PolicyKind::Fifo)]
#[case("lru", PolicyKind::Lru)]
#[case("Lru", PolicyKind::Lru)]
#[case("2a", PolicyKind::SecondChance)]
#[case("2A", PolicyKind::SecondChance)]
#[case("second-chance", PolicyKind::SecondChance)]
#[case("clock", PolicyKind::SecondChance)]
#[case("random", PolicyKind::Random)]
#[case(" rand ", PolicyKind::Random)]
fn test_policy_parse(#[case] text: &str, #[case] expected: PolicyKind) {
    assert_eq!(text.parse::<PolicyKind>().unwrap(), expected);
}

#[rstest]
#[case("mru")]
#[case("")]
#[case("lfu")]
fn test_policy_parse_unknown(#[case] text: &str) {
    assert_eq!(
        text.parse::<PolicyKind>(),
        Err(SimError::UnknownPolicy(text.to_string()))
    );
}

#[test]
fn test_policy_display_round_trips() {
    for kind in PolicyKind::ALL {
        assert_eq!(kind.to_string().parse::<PolicyKind>().unwrap(), kind);
    }
}

#[rstest]
#[case("direct", Scheme::Direct)]
#[case("dense", Scheme::Direct)]
#[case("Hierarchical", Scheme::Hierarchical)]
#[case("two-level", Scheme::Hierarchical)]
#[case("inverted", Scheme::Inverted)]
fn test_scheme_parse(#[case] text: &str, #[case] expected: Scheme) {
    assert_eq!(text.parse::<Scheme>().unwrap(), expected);
}

#[test]
fn test_scheme_parse_unknown() {
    assert!(matches!(
        "hashed".parse::<Scheme>(),
        Err(SimError::InvalidConfig(_))
    ));
}

#[test]
fn test_deserialize_empty_json_uses_defaults() {
    let config: SimConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, SimConfig::default());
}

#[test]
fn test_deserialize_full_json() {
    let json = r#"{
        "policy": "random",
        "page_size": 2048,
        "memory_size": 8192,
        "address_bits": 24,
        "seed": 99,
        "schemes": ["hierarchical", "direct"]
    }"#;
    let config: SimConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.policy, PolicyKind::Random);
    assert_eq!(config.page_size, 2048);
    assert_eq!(config.memory_size, 8192);
    assert_eq!(config.address_bits, 24);
    assert_eq!(config.seed, 99);
    assert_eq!(config.schemes, vec![Scheme::Hierarchical, Scheme::Direct]);

    let geometry = config.geometry().unwrap();
    assert_eq!(geometry.num_frames, 4);
    assert_eq!(geometry.num_pages, 1 << 13);
}

#[test]
fn test_deserialize_policy_aliases() {
    let config: SimConfig = serde_json::from_str(r#"{ "policy": "2a" }"#).unwrap();
    assert_eq!(config.policy, PolicyKind::SecondChance);

    let config: SimConfig = serde_json::from_str(r#"{ "policy": "second-chance" }"#).unwrap();
    assert_eq!(config.policy, PolicyKind::SecondChance);
}

#[test]
fn test_deserialize_unknown_policy_fails() {
    let result = serde_json::from_str::<SimConfig>(r#"{ "policy": "optimal" }"#);
    let message = result.unwrap_err().to_string();
    assert!(message.contains("optimal"), "unexpected error: {message}");
}

#[test]
fn test_serialize_round_trip() {
    let config = SimConfig {
        policy: PolicyKind::Lru,
        schemes: vec![Scheme::Inverted],
        ..SimConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""policy":"lru""#));
    assert!(json.contains(r#""schemes":["inverted"]"#));
    let back: SimConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
