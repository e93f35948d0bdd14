use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::model::{CalculatorInput, CompanyInfo, CustomerInfo, ServiceDetails};
use crate::utils::error::{FieldError, QuoteError, Result};
use crate::utils::validation::{self, Validate};

/// A complete quote request as collected by the form collaborator:
/// the calculator input plus the parties and optional free-text notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub service: CalculatorInput,
    pub customer: CustomerInfo,
    pub company: CompanyInfo,
    #[serde(default)]
    pub notes: Option<String>,
}

impl QuoteRequest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QuoteError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| QuoteError::Config {
            field: "request".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Display summary for the assembled quote, derived from the request.
    pub fn service_details(&self, unit_label: &str) -> ServiceDetails {
        ServiceDetails {
            category: self.service.service_category,
            quantity: self.service.quantity,
            unit_label: unit_label.to_string(),
            frequency: self.service.frequency,
            location: self.service.location,
        }
    }
}

/// Replace `${VAR}` placeholders with environment values; unknown variables
/// are left as-is so the TOML error points at them.
fn substitute_env_vars(content: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

impl Validate for QuoteRequest {
    /// Surface-level checks on the parties. Pricing validation belongs to
    /// the engine, quote validation to the assembler.
    fn validate(&self) -> Result<()> {
        let mut errors: Vec<FieldError> = Vec::new();

        validation::check_non_empty("customer.name", &self.customer.name, &mut errors);
        validation::check_email("customer.email", &self.customer.email, &mut errors);
        validation::check_non_empty("company.name", &self.company.name, &mut errors);
        validation::check_non_empty("company.address", &self.company.address, &mut errors);
        validation::check_email("company.email", &self.company.email, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(QuoteError::Validation(errors))
        }
    }
}
