use anyhow::Result;
use rstest::rstest;
use twindiff::compare::{
    CompareView, FormatError, InputPair, PREFIX_LENGTH, Side, Strategy, resolve,
};
use twindiff::options::CompareMode;

mod common;
use common::TestEnv;

fn view(mode: CompareMode) -> CompareView {
    CompareView {
        mode,
        ignore_xml_whitespace: false,
        footprint_length: 8,
    }
}

#[test]
fn test_auto_detects_binary_file_pair() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.bin", &[0xFF, 0x00, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC])?;
    let b = env.file("b.bin", &[0xFF, 0x00, 0x12, 0x34, 0x99, 0x99, 0x99, 0x99])?;

    let resolution = resolve(&InputPair::files(a, b), &view(CompareMode::Auto))?;

    assert_eq!(resolution.strategy, Strategy::Binary);
    assert!(resolution.is_binary());
    assert_eq!(resolution.a.ignored_prefix_len, PREFIX_LENGTH);
    assert_eq!(resolution.b.ignored_prefix_len, PREFIX_LENGTH);
    // Every produced line carries the positional prefix on both sides.
    for lines in [&resolution.a, &resolution.b] {
        for line in &lines.lines {
            assert!(line.len() > PREFIX_LENGTH);
            assert!(line.as_bytes()[8] == b':');
        }
    }
    Ok(())
}

#[test]
fn test_one_binary_side_is_enough_under_auto() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.txt", b"plain text\n")?;
    let b = env.file("b.bin", &[0x00, 0x01, 0x02, 0xFF])?;

    let resolution = resolve(&InputPair::files(a, b), &view(CompareMode::Auto))?;
    assert_eq!(resolution.strategy, Strategy::Binary);
    Ok(())
}

#[test]
fn test_forced_binary_on_text_files() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.txt", b"same words\n")?;
    let b = env.file("b.txt", b"same words\n")?;

    let resolution = resolve(&InputPair::files(a, b), &view(CompareMode::Binary))?;

    assert_eq!(resolution.strategy, Strategy::Binary);
    assert!(resolution.a.ignored_prefix_len > 0);
    Ok(())
}

#[test]
fn test_auto_picks_xml_for_well_formed_files() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.xml", b"<root><item>1</item></root>")?;
    let b = env.file("b.xml", b"<root>\n  <item>2</item>\n</root>")?;

    let resolution = resolve(&InputPair::files(a, b), &view(CompareMode::Auto))?;

    assert_eq!(resolution.strategy, Strategy::Xml);
    assert_eq!(resolution.a.ignored_prefix_len, 0);
    assert_eq!(resolution.b.ignored_prefix_len, 0);
    Ok(())
}

#[test]
fn test_auto_falls_back_to_text_on_malformed_xml() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.txt", b"<not really xml\n")?;
    let b = env.file("b.xml", b"<root/>")?;

    let resolution = resolve(&InputPair::files(a, b), &view(CompareMode::Auto))?;
    assert_eq!(resolution.strategy, Strategy::Text);
    Ok(())
}

#[test]
fn test_strict_xml_malformed_a_never_reads_b() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.xml", b"<broken")?;
    // B does not exist: reaching it would turn this into an I/O error.
    let b = env.temp_dir.path().join("does_not_exist.xml");

    let error = resolve(&InputPair::files(a, b), &view(CompareMode::Xml)).unwrap_err();

    let format_error = error
        .downcast_ref::<FormatError>()
        .expect("must be a format error, not I/O");
    assert_eq!(format_error.side, Side::A);
    assert!(!format_error.detail.is_empty());
    Ok(())
}

#[test]
fn test_strict_xml_reports_side_b() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.xml", b"<fine/>")?;
    let b = env.file("b.xml", b"<broken")?;

    let error = resolve(&InputPair::files(a, b), &view(CompareMode::Xml)).unwrap_err();
    let format_error = error.downcast_ref::<FormatError>().unwrap();
    assert_eq!(format_error.side, Side::B);
    Ok(())
}

#[rstest]
#[case("", "")]
#[case("<broken", "<also broken")]
#[case("plain\ntext", "<valid/>")]
#[case("\u{0}\u{1}\u{2}", "control characters")]
fn test_auto_never_raises_format_errors_for_texts(#[case] a: &str, #[case] b: &str) {
    let pair = InputPair::texts(a, b);
    let resolution = resolve(&pair, &view(CompareMode::Auto)).unwrap();
    assert_ne!(resolution.strategy, Strategy::Binary, "text pairs skip binary");
}

#[test]
fn test_text_mode_prefix_is_zero() {
    let pair = InputPair::texts("<a/>", "<a/>");
    let resolution = resolve(&pair, &view(CompareMode::Text)).unwrap();
    assert_eq!(resolution.strategy, Strategy::Text);
    assert_eq!(resolution.a.ignored_prefix_len, 0);
}

#[test]
fn test_missing_file_propagates_io_error() {
    let pair = InputPair::files("/no/such/file/a", "/no/such/file/b");
    let error = resolve(&pair, &view(CompareMode::Auto)).unwrap_err();
    assert!(error.downcast_ref::<FormatError>().is_none(), "I/O, not format");
}

#[test]
fn test_both_sides_always_share_a_strategy() -> Result<()> {
    let env = TestEnv::new()?;
    // A parses as XML, B does not: the pair must not split across
    // strategies, so both land in text.
    let a = env.file("a.xml", b"<root/>")?;
    let b = env.file("b.txt", b"not xml\n")?;

    let resolution = resolve(&InputPair::files(a, b), &view(CompareMode::Auto))?;
    assert_eq!(resolution.strategy, Strategy::Text);
    assert_eq!(resolution.a.ignored_prefix_len, resolution.b.ignored_prefix_len);
    Ok(())
}

#[test]
fn test_identical_binary_files_compare_equal_after_prefix() -> Result<()> {
    let env = TestEnv::new()?;
    let bytes: Vec<u8> = (0u8..64).chain([0xFF, 0x00].into_iter().cycle().take(16)).collect();
    let a = env.file("a.bin", &bytes)?;
    let b = env.file("b.bin", &bytes)?;

    let resolution = resolve(&InputPair::files(a, b), &view(CompareMode::Auto))?;

    assert_eq!(resolution.strategy, Strategy::Binary);
    assert_eq!(resolution.a.lines.len(), resolution.b.lines.len());
    for index in 0..resolution.a.lines.len() {
        assert_eq!(
            resolution.a.comparable(index),
            resolution.b.comparable(index)
        );
    }
    Ok(())
}
