use crate::core::{ErrorContext, Result};
use regex::Regex;

/// A single exclusion rule tested against absolute host path strings.
///
/// Matching is prefix-style: the pattern is anchored at the start of the
/// path and unanchored at the end, so a rule matching a prefix of the path
/// excludes it even when trailing characters follow. This is compatibility
/// behavior and must not be tightened to full-string matching.
pub struct ExclusionRule {
    pattern: String,
    intent: &'static str,
    regex: Regex,
    exception: Option<Regex>,
}

impl ExclusionRule {
    /// Compile a rule from a pattern and a short description of its intent
    pub fn new(pattern: &str, intent: &'static str) -> Result<Self> {
        let regex = compile_prefix(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            intent,
            regex,
            exception: None,
        })
    }

    /// Compile a rule with an exception pattern; a path matching both the
    /// rule and the exception is retained.
    pub fn with_exception(pattern: &str, exception: &str, intent: &'static str) -> Result<Self> {
        let regex = compile_prefix(pattern)?;
        let exception = compile_prefix(exception)?;
        Ok(Self {
            pattern: pattern.to_string(),
            intent,
            regex,
            exception: Some(exception),
        })
    }

    /// Check whether this rule excludes the given host path
    pub fn matches(&self, host_path: &str) -> bool {
        if !self.regex.is_match(host_path) {
            return false;
        }
        match &self.exception {
            Some(exception) => !exception.is_match(host_path),
            None => true,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn intent(&self) -> &'static str {
        self.intent
    }
}

/// Anchor a pattern at the start of the subject, leaving the end open,
/// matching Python's `re.match` semantics.
fn compile_prefix(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})", pattern))
        .context_exclusion("Invalid exclusion pattern", pattern)
}

/// Immutable ordered set of exclusion rules, constructed once at startup
pub struct ExclusionSet {
    rules: Vec<ExclusionRule>,
}

impl ExclusionSet {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    /// Rules for artifacts that must never be pushed to a test device.
    ///
    /// The pattern list is policy inherited from the Android test
    /// deployment tooling and must be reproduced verbatim for
    /// compatibility.
    pub fn device_defaults() -> Result<Self> {
        let rules = vec![
            ExclusionRule::new(r".*OWNERS", "Should never be included")?,
            ExclusionRule::new(r".*\.crx", "Chrome extension zip files")?,
            ExclusionRule::new(r".*\.so", "Libraries packed into .apk")?,
            ExclusionRule::new(r".*Mojo.*manifest\.json", "Some source sets pull these in")?,
            ExclusionRule::new(r".*\.py", "Some test_support targets include python deps")?,
            ExclusionRule::new(r".*\.stamp", "Stamp files should never be included")?,
            // Mojom targets add a data dependency on js bindings. Those
            // files are not pushed, except for JsToCppTest.mojom.js, which
            // webkit_unit_tests needs at runtime.
            ExclusionRule::with_exception(
                r".*\.mojom\.js",
                r".*JsToCpp.*\.mojom\.js",
                "Mojo js bindings",
            )?,
            ExclusionRule::new(
                r".*external_extensions\.json",
                "Chrome external extensions config file",
            )?,
            ExclusionRule::new(
                r".*jni_generator_tests",
                "Exists just to test the compile, not to be run",
            )?,
            ExclusionRule::new(r".*natives_blob.*\.bin", "v8 blobs get packaged into APKs")?,
            ExclusionRule::new(r".*snapshot_blob.*\.bin", "v8 blobs get packaged into APKs")?,
        ];
        Ok(Self::new(rules))
    }

    /// Check whether any rule excludes the given host path
    pub fn is_excluded(&self, host_path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(host_path))
    }

    /// Find the rule responsible for excluding the given host path
    pub fn matching_rule(&self, host_path: &str) -> Option<&ExclusionRule> {
        self.rules.iter().find(|rule| rule.matches(host_path))
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ExclusionSet {
        ExclusionSet::device_defaults().unwrap()
    }

    #[test]
    fn test_owners_files_excluded() {
        let rules = defaults();

        assert!(rules.is_excluded("/src/out/Release/foo/OWNERS"));
        assert!(rules.is_excluded("/src/chrome/OWNERS"));
        assert!(!rules.is_excluded("/src/out/Release/owners.txt"));
    }

    #[test]
    fn test_binary_artifacts_excluded() {
        let rules = defaults();

        assert!(rules.is_excluded("/src/out/Release/libbase.so"));
        assert!(rules.is_excluded("/src/out/Release/extension.crx"));
        assert!(rules.is_excluded("/src/out/Release/obj/foo.stamp"));
        assert!(rules.is_excluded("/src/out/Release/natives_blob_32.bin"));
        assert!(rules.is_excluded("/src/out/Release/snapshot_blob.bin"));
    }

    #[test]
    fn test_mojom_js_exemption() {
        let rules = defaults();

        assert!(rules.is_excluded("/src/out/Release/gen/foo.mojom.js"));
        assert!(!rules.is_excluded("/src/out/Release/gen/bar/JsToCppTest.mojom.js"));
    }

    #[test]
    fn test_prefix_matching_is_end_unanchored() {
        let rules = defaults();

        // '.*\.py' matches a prefix of the path, so compiled python files
        // and backups are excluded too. Inherited behavior.
        assert!(rules.is_excluded("/src/out/Release/test_support/helper.pyc"));
        assert!(rules.is_excluded("/src/tools/run.py"));
    }

    #[test]
    fn test_prefix_matching_is_start_anchored() {
        let rule = ExclusionRule::new(r"foo", "test rule").unwrap();

        assert!(rule.matches("foobar"));
        assert!(!rule.matches("barfoo"));
    }

    #[test]
    fn test_matching_rule_reports_intent() {
        let rules = defaults();

        let rule = rules.matching_rule("/src/out/Release/foo/OWNERS").unwrap();
        assert_eq!(rule.pattern(), r".*OWNERS");
        assert_eq!(rule.intent(), "Should never be included");

        assert!(rules.matching_rule("/src/out/Release/chrome.apk").is_none());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = ExclusionRule::new(r"*[", "broken");
        assert!(result.is_err());
    }
}
