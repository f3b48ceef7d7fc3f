//! Input data shape for a single generated specification document.
//!
//! A [`SpecificationRecord`] fully describes the content of one integration
//! flow document.  The fields are opaque business text; the only logic here is
//! the presence check performed by [`SpecificationRecord::validate`].  The
//! collection fields are always present (possibly empty) so the document
//! builder can iterate them without null handling.

use std::fmt;

/// A named processing step together with its description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptStep {
    name: String,
    description: String,
}

impl ScriptStep {
    /// Creates a new script step.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Returns the step name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A test condition paired with its expected result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestCondition {
    condition: String,
    expected_result: String,
}

impl TestCondition {
    /// Creates a new test condition pair.
    pub fn new(condition: impl Into<String>, expected_result: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            expected_result: expected_result.into(),
        }
    }

    /// Returns the condition under test.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Returns the expected result.
    pub fn expected_result(&self) -> &str {
        &self.expected_result
    }
}

/// One input record describing the content of a single generated document.
///
/// `name`, `technical_name` and `overview` must be non-empty; everything else
/// is free-form text.  `technical_name` doubles as the output filename key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecificationRecord {
    name: String,
    technical_name: String,
    endpoint: String,
    package: String,
    module: String,
    sub_module: String,
    processing_type: String,
    frequency: String,
    overview: String,
    requirements: Vec<String>,
    scripts: Vec<ScriptStep>,
    /// May contain embedded line breaks representing multiple logical facts.
    adapter: String,
    test_conditions: Vec<TestCondition>,
}

impl SpecificationRecord {
    /// Creates a record with the identity fields set and everything else empty.
    pub fn new(
        name: impl Into<String>,
        technical_name: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            technical_name: technical_name.into(),
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Returns the human-readable flow name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the technical name used as the output filename key.
    pub fn technical_name(&self) -> &str {
        &self.technical_name
    }

    /// Returns the endpoint URI path.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the owning package name.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns the module classification.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the sub-module classification.
    pub fn sub_module(&self) -> &str {
        &self.sub_module
    }

    /// Returns the processing type classification.
    pub fn processing_type(&self) -> &str {
        &self.processing_type
    }

    /// Returns the execution frequency description.
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    /// Returns the overview narrative.
    pub fn overview(&self) -> &str {
        &self.overview
    }

    /// Returns the ordered requirement texts.
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    /// Returns the ordered script steps.
    pub fn scripts(&self) -> &[ScriptStep] {
        &self.scripts
    }

    /// Returns the adapter description, possibly spanning multiple lines.
    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    /// Returns the ordered test condition pairs.
    pub fn test_conditions(&self) -> &[TestCondition] {
        &self.test_conditions
    }

    /// Sets the classification fields and returns the updated record.
    pub fn with_classification(
        mut self,
        package: impl Into<String>,
        module: impl Into<String>,
        sub_module: impl Into<String>,
        processing_type: impl Into<String>,
        frequency: impl Into<String>,
    ) -> Self {
        self.package = package.into();
        self.module = module.into();
        self.sub_module = sub_module.into();
        self.processing_type = processing_type.into();
        self.frequency = frequency.into();
        self
    }

    /// Sets the overview narrative and returns the updated record.
    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    /// Replaces the requirement list and returns the updated record.
    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the script steps and returns the updated record.
    pub fn with_scripts<I>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = ScriptStep>,
    {
        self.scripts = scripts.into_iter().collect();
        self
    }

    /// Sets the adapter description and returns the updated record.
    pub fn with_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = adapter.into();
        self
    }

    /// Replaces the test conditions and returns the updated record.
    pub fn with_test_conditions<I>(mut self, test_conditions: I) -> Self
    where
        I: IntoIterator<Item = TestCondition>,
    {
        self.test_conditions = test_conditions.into_iter().collect();
        self
    }

    /// Identity string used in diagnostics: the technical name when present,
    /// otherwise the display name.
    pub fn identity(&self) -> &str {
        if self.technical_name.is_empty() {
            &self.name
        } else {
            &self.technical_name
        }
    }

    /// Checks that the mandatory fields are non-empty.
    ///
    /// Collection fields may be empty; a missing mandatory field is an input
    /// defect reported through [`MissingFieldError`] naming both the field and
    /// the record.
    pub fn validate(&self) -> Result<(), MissingFieldError> {
        for (field, value) in [
            ("name", &self.name),
            ("technical_name", &self.technical_name),
            ("overview", &self.overview),
        ] {
            if value.trim().is_empty() {
                return Err(MissingFieldError::new(self.identity(), field));
            }
        }
        Ok(())
    }
}

/// A required record field was absent or empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingFieldError {
    record: String,
    field: &'static str,
}

impl MissingFieldError {
    fn new(record: impl Into<String>, field: &'static str) -> Self {
        Self {
            record: record.into(),
            field,
        }
    }

    /// Identity of the record that failed validation.
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Name of the missing field.
    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl fmt::Display for MissingFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record '{}' is missing required field '{}'",
            self.record, self.field
        )
    }
}

impl std::error::Error for MissingFieldError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SpecificationRecord {
        SpecificationRecord::new("Delete Work Assignment", "SF_WorkAssignment_Delete", "/deleteWAList")
            .with_overview("Deletes work assignments by cancelling them.")
    }

    #[test]
    fn valid_record_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn missing_overview_names_field_and_record() {
        let record = SpecificationRecord::new("Flow", "TECH_Flow", "/x");
        let err = record.validate().unwrap_err();
        assert_eq!(err.field(), "overview");
        assert_eq!(err.record(), "TECH_Flow");
        assert!(err.to_string().contains("TECH_Flow"));
        assert!(err.to_string().contains("overview"));
    }

    #[test]
    fn whitespace_only_name_is_missing() {
        let record = SpecificationRecord::new("   ", "TECH", "/x").with_overview("text");
        let err = record.validate().unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn identity_falls_back_to_name() {
        let record = SpecificationRecord::new("Only Name", "", "/x");
        assert_eq!(record.identity(), "Only Name");
    }

    #[test]
    fn collections_default_to_empty_not_absent() {
        let record = sample();
        assert!(record.requirements().is_empty());
        assert!(record.scripts().is_empty());
        assert!(record.test_conditions().is_empty());
    }
}
