//! The property set written into a binary's version resource.

use std::fmt;
use std::str::FromStr;

use toolkit::{get_input, InputSource};

use crate::RceditError;

/// Value of the manifest's `requestedExecutionLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionLevel {
    AsInvoker,
    HighestAvailable,
    RequireAdministrator,
}

impl ExecutionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionLevel::AsInvoker => "asInvoker",
            ExecutionLevel::HighestAvailable => "highestAvailable",
            ExecutionLevel::RequireAdministrator => "requireAdministrator",
        }
    }
}

impl fmt::Display for ExecutionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionLevel {
    type Err = RceditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asInvoker" => Ok(ExecutionLevel::AsInvoker),
            "highestAvailable" => Ok(ExecutionLevel::HighestAvailable),
            "requireAdministrator" => Ok(ExecutionLevel::RequireAdministrator),
            other => Err(RceditError::InvalidExecutionLevel {
                value: other.to_string(),
            }),
        }
    }
}

/// Version-info strings and resource options. Empty strings mean "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceProperties {
    pub comments: String,
    pub company_name: String,
    pub file_description: String,
    pub internal_filename: String,
    pub legal_copyright: String,
    pub legal_trademarks1: String,
    pub legal_trademarks2: String,
    pub original_filename: String,
    pub product_name: String,
    pub file_version: String,
    pub product_version: String,
    pub icon: String,
    pub requested_execution_level: Option<ExecutionLevel>,
    pub application_manifest: String,
}

impl ResourceProperties {
    /// Reads and validates the fourteen property inputs.
    ///
    /// Fails with [`RceditError::NoProperties`] when every input is empty, then
    /// with [`RceditError::InvalidExecutionLevel`] for an unknown level.
    pub fn from_inputs(source: &(impl InputSource + ?Sized)) -> Result<Self, RceditError> {
        let execution_level = get_input(source, "requested-execution-level");
        let mut properties = Self {
            comments: get_input(source, "comments"),
            company_name: get_input(source, "company-name"),
            file_description: get_input(source, "file-description"),
            internal_filename: get_input(source, "internal-filename"),
            legal_copyright: get_input(source, "legal-copyright"),
            legal_trademarks1: get_input(source, "legal-trademarks1"),
            legal_trademarks2: get_input(source, "legal-trademarks2"),
            original_filename: get_input(source, "original-filename"),
            product_name: get_input(source, "product-name"),
            file_version: get_input(source, "file-version"),
            product_version: get_input(source, "product-version"),
            icon: get_input(source, "icon"),
            requested_execution_level: None,
            application_manifest: get_input(source, "application-manifest"),
        };

        if properties.is_empty() && execution_level.is_empty() {
            return Err(RceditError::NoProperties);
        }
        if !execution_level.is_empty() {
            properties.requested_execution_level = Some(execution_level.parse()?);
        }
        Ok(properties)
    }

    /// True when no property would be written.
    pub fn is_empty(&self) -> bool {
        self.version_strings().next().is_none()
            && self.options().next().is_none()
    }

    /// Non-empty version-info strings, keyed by their resource names.
    pub fn version_strings(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Comments", self.comments.as_str()),
            ("CompanyName", self.company_name.as_str()),
            ("FileDescription", self.file_description.as_str()),
            ("InternalFilename", self.internal_filename.as_str()),
            ("LegalCopyright", self.legal_copyright.as_str()),
            ("LegalTrademarks1", self.legal_trademarks1.as_str()),
            ("LegalTrademarks2", self.legal_trademarks2.as_str()),
            ("OriginalFilename", self.original_filename.as_str()),
            ("ProductName", self.product_name.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    }

    /// Non-empty options, keyed by their rcedit flag.
    fn options(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("--set-file-version", self.file_version.as_str()),
            ("--set-product-version", self.product_version.as_str()),
            ("--set-icon", self.icon.as_str()),
            (
                "--set-requested-execution-level",
                self.requested_execution_level
                    .map(ExecutionLevel::as_str)
                    .unwrap_or_default(),
            ),
            ("--application-manifest", self.application_manifest.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    }

    /// The rcedit command-line arguments that follow the target file.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (key, value) in self.version_strings() {
            args.extend(["--set-version-string".to_string(), key.to_string(), value.to_string()]);
        }
        for (flag, value) in self.options() {
            args.extend([flag.to_string(), value.to_string()]);
        }
        args
    }
}
