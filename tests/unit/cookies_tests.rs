/*!
 * Tests for cookie file parsing
 */

use anyhow::Result;
use bilisub::cookies::CookieJar;
use crate::common;

#[test]
fn test_parse_withBrowserHeader_shouldSplitPairs() {
    let jar = CookieJar::parse("a=1; b=x=y ;c=3");

    assert_eq!(jar.len(), 3);
    assert_eq!(jar.get("a"), Some("1"));
    assert_eq!(jar.get("b"), Some("x=y"));
    assert_eq!(jar.get("c"), Some("3"));
}

#[test]
fn test_parse_withTrailingSeparatorAndNewline_shouldIgnoreEmptyFragments() {
    let jar = CookieJar::parse("SESSDATA=abc%2C123; bili_jct=def;\n");

    assert_eq!(jar.len(), 2);
    assert_eq!(jar.get("SESSDATA"), Some("abc%2C123"));
    assert_eq!(jar.get("bili_jct"), Some("def"));
}

#[test]
fn test_parse_withDuplicateName_shouldKeepLastValue() {
    let jar = CookieJar::parse("a=1; b=2; a=3");

    assert_eq!(jar.get("a"), Some("3"));
    assert_eq!(jar.header_value().as_deref(), Some("a=3; b=2"));
}

#[test]
fn test_header_value_withEmptyJar_shouldBeNone() {
    assert!(CookieJar::parse("").is_empty());
    assert_eq!(CookieJar::default().header_value(), None);
}

#[test]
fn test_load_withMissingFile_shouldReturnEmptyJar() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let jar = CookieJar::load(temp_dir.path().join("cookies.txt"));

    assert!(jar.is_empty());
    Ok(())
}

#[test]
fn test_load_withCookieFile_shouldParseContents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "cookies.txt", "buvid3=xyz; SESSDATA=abc\n")?;

    let jar = CookieJar::load(&path);

    assert_eq!(jar.get("buvid3"), Some("xyz"));
    assert_eq!(jar.header_value().as_deref(), Some("buvid3=xyz; SESSDATA=abc"));
    Ok(())
}
