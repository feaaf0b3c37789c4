//! Target profiles
//!
//! Named deployments of the application under test, each with optional
//! overrides and its own case selection.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::HarnessConfig;
use crate::checks::{builtin_suite, find_case};
use crate::models::TestCase;

/// A named target with optional setting overrides
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TargetProfile {
    /// Profile name
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Base URL of this deployment
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_timeout_secs: Option<u64>,

    /// Built-in case names to run, in order. Empty selects the whole suite.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cases: Vec<String>,

    /// Additional cases appended after the selection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_cases: Vec<TestCase>,
}

impl TargetProfile {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            base_url: base_url.into(),
            retries: None,
            retry_delay_secs: None,
            wait_timeout_secs: None,
            cases: Vec::new(),
            extra_cases: Vec::new(),
        }
    }

    /// Application started locally by a developer
    pub fn local() -> Self {
        let mut profile = Self::new("local", "http://localhost:3000/");
        profile.description = "Frontend dev server on this machine".to_string();
        profile
    }

    /// Application running as a sibling container, given more time to boot
    pub fn container() -> Self {
        let mut profile = Self::new("container", "http://frontend:3000/");
        profile.description = "Frontend service inside a compose network".to_string();
        profile.retries = Some(20);
        profile.retry_delay_secs = Some(5);
        profile
    }

    /// Overlay this profile's settings onto a harness configuration
    pub fn apply(&self, config: &mut HarnessConfig) {
        config.base_url = self.base_url.clone();
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if let Some(delay) = self.retry_delay_secs {
            config.retry_delay_secs = delay;
        }
        if let Some(timeout) = self.wait_timeout_secs {
            config.wait_timeout_secs = timeout;
        }
    }

    /// Resolve the ordered list of cases this profile runs
    pub fn select_cases(&self) -> Result<Vec<TestCase>> {
        let mut cases = if self.cases.is_empty() {
            builtin_suite()
        } else {
            self.cases
                .iter()
                .map(|name| {
                    find_case(name).ok_or_else(|| {
                        anyhow::anyhow!("Unknown case '{}' in profile '{}'", name, self.name)
                    })
                })
                .collect::<Result<Vec<_>>>()?
        };
        cases.extend(self.extra_cases.iter().cloned());
        Ok(cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Check;

    #[test]
    fn test_presets() {
        assert_eq!(TargetProfile::local().base_url, "http://localhost:3000/");
        let container = TargetProfile::container();
        assert_eq!(container.retries, Some(20));
        assert!(container.cases.is_empty());
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let mut config = HarnessConfig::default();
        let mut profile = TargetProfile::new("staging", "https://staging.example.com/");
        profile.wait_timeout_secs = Some(30);

        profile.apply(&mut config);
        assert_eq!(config.base_url, "https://staging.example.com/");
        assert_eq!(config.wait_timeout_secs, 30);
        assert_eq!(config.retries, 10);
    }

    #[test]
    fn test_select_all_by_default() {
        let cases = TargetProfile::local().select_cases().unwrap();
        assert_eq!(cases, builtin_suite());
    }

    #[test]
    fn test_select_named_and_extra_cases() {
        let mut profile = TargetProfile::local();
        profile.cases = vec![
            "home_page_title".to_string(),
            "load_home_page".to_string(),
        ];
        profile
            .extra_cases
            .push(TestCase::new("about_title", Check::title_present("/about")));

        let names: Vec<_> = profile
            .select_cases()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["home_page_title", "load_home_page", "about_title"]);
    }

    #[test]
    fn test_unknown_case_is_an_error() {
        let mut profile = TargetProfile::local();
        profile.cases = vec!["checkout".to_string()];
        let err = profile.select_cases().unwrap_err();
        assert!(err.to_string().contains("checkout"));
    }

    #[test]
    fn test_profile_from_yaml() {
        let yaml = r#"
name: staging
base_url: https://staging.example.com/
retries: 3
extra_cases:
  - name: about_redirect
    check:
      kind: url_contains
      path: /about
      expected: /info
"#;
        let profile: TargetProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.retries, Some(3));
        assert_eq!(profile.extra_cases[0].check, Check::url_contains("/about", "/info"));
    }
}
