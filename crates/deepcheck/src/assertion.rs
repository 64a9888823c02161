//! Chainable assertions over a single value.

use deepcheck_values::Value;
use std::fmt;
use std::rc::Rc;

use crate::compare::compare;
use crate::config::AssertionSettings;
use crate::error::{AssertError, AssertResult, CompareError};
use crate::format::MessageFormatter;
use crate::options::{AssertOptions, CompareType};
use crate::output::OutputSink;
use crate::registry::ComparerRegistry;
use crate::result::ComparisonResult;

/// Creates assertions that share a comparer registry, settings and output sink.
#[derive(Clone)]
pub struct Asserter {
    registry: Rc<ComparerRegistry>,
    settings: AssertionSettings,
    sink: Rc<dyn OutputSink>,
}

impl Asserter {
    pub fn new(registry: ComparerRegistry, settings: AssertionSettings) -> Self {
        let sink = settings.sink.create();
        Self {
            registry: Rc::new(registry),
            settings,
            sink,
        }
    }

    /// The standard registry with default settings.
    pub fn standard() -> Self {
        Self::new(ComparerRegistry::standard(), AssertionSettings::default())
    }

    /// Send messages to `sink` instead of the one named in the settings.
    pub fn with_sink(mut self, sink: Rc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn registry(&self) -> &ComparerRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &AssertionSettings {
        &self.settings
    }

    /// Start asserting on `value`.
    pub fn that(&self, value: impl Into<Value>) -> Assertion {
        Assertion {
            value: value.into(),
            registry: Rc::clone(&self.registry),
            settings: self.settings.clone(),
            sink: Rc::clone(&self.sink),
            defaults: AssertOptions::default(),
            last: None,
        }
    }
}

impl Default for Asserter {
    fn default() -> Self {
        Self::standard()
    }
}

/// Start asserting on `value` with the standard asserter.
pub fn assert_that(value: impl Into<Value>) -> Assertion {
    Asserter::standard().that(value)
}

/// An assertion about one value.
///
/// Every verb runs a comparison, stores the result, and then either returns
/// [`AssertError::Failed`] or writes the failure to the output sink, depending
/// on `throw_on_failure`.
pub struct Assertion {
    value: Value,
    registry: Rc<ComparerRegistry>,
    settings: AssertionSettings,
    sink: Rc<dyn OutputSink>,
    defaults: AssertOptions,
    last: Option<ComparisonResult>,
}

impl Assertion {
    /// Options applied to every verb of this assertion unless the call overrides them.
    ///
    /// Fields left unset in `options` keep their earlier value.
    pub fn with_options(mut self, options: AssertOptions) -> Self {
        self.defaults = options.or(&self.defaults);
        self
    }

    pub fn throw_on_failure(mut self, value: bool) -> Self {
        self.defaults.throw_on_failure = Some(value);
        self
    }

    pub fn log_on_success(mut self, value: bool) -> Self {
        self.defaults.log_on_success = Some(value);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Result of the most recent verb, if any.
    pub fn last_comparison(&self) -> Option<&ComparisonResult> {
        self.last.as_ref()
    }

    /// Whether the most recent verb succeeded. `false` before any verb ran.
    pub fn is_success(&self) -> bool {
        self.last.as_ref().is_some_and(ComparisonResult::is_success)
    }

    pub fn equals(&mut self, expected: impl Into<Value>) -> AssertResult<&mut Self> {
        self.equals_with(expected, AssertOptions::default())
    }

    pub fn equals_with(
        &mut self,
        expected: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(expected.into(), requirements(CompareType::Equality, true), options)
    }

    pub fn does_not_equal(&mut self, other: impl Into<Value>) -> AssertResult<&mut Self> {
        self.does_not_equal_with(other, AssertOptions::default())
    }

    pub fn does_not_equal_with(
        &mut self,
        other: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(other.into(), requirements(CompareType::Equality, false), options)
    }

    pub fn is_equivalent_to(&mut self, expected: impl Into<Value>) -> AssertResult<&mut Self> {
        self.is_equivalent_to_with(expected, AssertOptions::default())
    }

    pub fn is_equivalent_to_with(
        &mut self,
        expected: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(expected.into(), requirements(CompareType::Equivalency, true), options)
    }

    pub fn is_not_equivalent_to(&mut self, other: impl Into<Value>) -> AssertResult<&mut Self> {
        self.is_not_equivalent_to_with(other, AssertOptions::default())
    }

    pub fn is_not_equivalent_to_with(
        &mut self,
        other: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(other.into(), requirements(CompareType::Equivalency, false), options)
    }

    /// Structural comparison that ignores array order and coerces primitives.
    pub fn is_roughly(&mut self, expected: impl Into<Value>) -> AssertResult<&mut Self> {
        self.is_roughly_with(expected, AssertOptions::default())
    }

    pub fn is_roughly_with(
        &mut self,
        expected: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(expected.into(), requirements(CompareType::Roughly, true), options)
    }

    pub fn is_not_roughly(&mut self, other: impl Into<Value>) -> AssertResult<&mut Self> {
        self.is_not_roughly_with(other, AssertOptions::default())
    }

    pub fn is_not_roughly_with(
        &mut self,
        other: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(other.into(), requirements(CompareType::Roughly, false), options)
    }

    /// Call `predicate` with the value and require a truthy result.
    pub fn is_true(&mut self, predicate: impl Into<Value>) -> AssertResult<&mut Self> {
        self.is_true_with(predicate, AssertOptions::default())
    }

    pub fn is_true_with(
        &mut self,
        predicate: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(predicate.into(), requirements(CompareType::Predicate, true), options)
    }

    /// Call `predicate` with the value and require a falsy result.
    pub fn is_false(&mut self, predicate: impl Into<Value>) -> AssertResult<&mut Self> {
        self.is_false_with(predicate, AssertOptions::default())
    }

    pub fn is_false_with(
        &mut self,
        predicate: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(predicate.into(), requirements(CompareType::Predicate, false), options)
    }

    /// Require the value, which must be an array, to hold an element equal to `item`.
    pub fn contains(&mut self, item: impl Into<Value>) -> AssertResult<&mut Self> {
        self.contains_with(item, AssertOptions::default())
    }

    pub fn contains_with(
        &mut self,
        item: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(item.into(), requirements(CompareType::Containment, true), options)
    }

    pub fn does_not_contain(&mut self, item: impl Into<Value>) -> AssertResult<&mut Self> {
        self.does_not_contain_with(item, AssertOptions::default())
    }

    pub fn does_not_contain_with(
        &mut self,
        item: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.run(item.into(), requirements(CompareType::Containment, false), options)
    }

    /// Compare with fully explicit options. `options.compare_type` must be set.
    ///
    /// Short-circuits unless the call or the assertion's defaults say otherwise.
    pub fn compare(
        &mut self,
        other: impl Into<Value>,
        options: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.last = None;
        if options.compare_type.is_none() {
            return Err(CompareError::InvalidOptions(
                "a compareType must be specified".to_string(),
            )
            .into());
        }
        let short_circuit = self.defaults.short_circuit.unwrap_or(true);
        let options = options.or(&AssertOptions::new().short_circuit(short_circuit));
        self.run(other.into(), AssertOptions::new(), options)
    }

    /// Like [`Assertion::compare`], with options given as camelCase JSON.
    pub fn compare_json(
        &mut self,
        other: impl Into<Value>,
        options: &str,
    ) -> AssertResult<&mut Self> {
        self.last = None;
        let options = AssertOptions::from_json(options)?;
        self.compare(other, options)
    }

    fn run(
        &mut self,
        other: Value,
        requirements: AssertOptions,
        call: AssertOptions,
    ) -> AssertResult<&mut Self> {
        self.last = None;
        let merged = requirements.or(&call.or(&self.defaults));
        let options = merged.resolve()?;
        let throw_on_failure = merged
            .throw_on_failure
            .unwrap_or(self.settings.throw_on_failure);
        let log_on_success = merged
            .log_on_success
            .unwrap_or(self.settings.log_on_success);

        let result = compare(&self.value, &other, &options, &self.registry)?;
        let formatter = MessageFormatter::new(self.settings.max_value_length);
        let success = result.is_success();
        let message = (!success || log_on_success).then(|| formatter.format(&result));
        self.last = Some(result);

        match message {
            None => {
                log::debug!("Assertion passed ({})", options.compare_type);
                Ok(self)
            }
            Some(message) if success => {
                log::debug!("Assertion passed ({})", options.compare_type);
                self.sink.write(&message);
                Ok(self)
            }
            Some(message) if throw_on_failure => {
                log::debug!("Assertion failed ({})", options.compare_type);
                Err(AssertError::Failed { message })
            }
            Some(message) => {
                log::warn!("Assertion failed ({}), continuing", options.compare_type);
                self.sink.write(&message);
                Ok(self)
            }
        }
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("value", &self.value)
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// Options a verb always applies, over anything the caller passes.
fn requirements(compare_type: CompareType, affirmative_check: bool) -> AssertOptions {
    let options = AssertOptions::new()
        .compare_type(compare_type)
        .affirmative_check(affirmative_check)
        .short_circuit(true);

    match compare_type {
        CompareType::Roughly => options.ignore_references(true).ignore_order(true),
        _ => options,
    }
}
