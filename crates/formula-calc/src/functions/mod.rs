use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use formula_bignum::{default_calculator, BigDecimal, BigNumber, CalculatorRef};

use crate::error::{CalcError, CalcResult};
use crate::settings::EvalSettings;

// Built-in functions registered with the inventory-backed collection live in dedicated modules.
mod builtins_date;
mod builtins_math;

/// A function callable from an expression. Arguments arrive in call-syntax order.
pub type Callable = Arc<dyn Fn(&[BigDecimal]) -> CalcResult<BigDecimal> + Send + Sync>;

#[derive(Clone)]
pub struct RegisteredFunction {
    name: String,
    arity: usize,
    callable: Callable,
}

impl RegisteredFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of operands the function consumes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
        if args.len() != self.arity {
            return Err(CalcError::evaluation(format!(
                "function {} expects {} arguments, got {}",
                self.name,
                self.arity,
                args.len()
            )));
        }
        (self.callable)(args)
    }
}

impl fmt::Debug for RegisteredFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// What built-in implementations can see besides their arguments.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    settings: EvalSettings,
    calculator: CalculatorRef,
}

impl FunctionContext {
    pub fn new(settings: EvalSettings, calculator: CalculatorRef) -> Self {
        Self {
            settings,
            calculator,
        }
    }

    pub fn settings(&self) -> &EvalSettings {
        &self.settings
    }

    pub fn calculator(&self) -> &CalculatorRef {
        &self.calculator
    }

    /// An integer result carrying this context's calculator.
    pub(crate) fn integer(&self, value: i64) -> CalcResult<BigDecimal> {
        Ok(BigDecimal::of_with(value, &self.calculator)?)
    }
}

pub type BuiltinImpl = fn(&FunctionContext, &[BigDecimal]) -> CalcResult<BigDecimal>;

/// A built-in function, declared with `inventory::submit!`.
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub arity: usize,
    pub implementation: BuiltinImpl,
}

inventory::collect!(BuiltinFunction);

/// Iterate all [`BuiltinFunction`] registrations collected via [`inventory`].
pub fn iter_builtins() -> impl Iterator<Item = &'static BuiltinFunction> {
    inventory::iter::<BuiltinFunction>.into_iter()
}

/// Named functions available to an evaluator.
///
/// Names are case-insensitive and stored lowercase; they may contain only ASCII letters and
/// underscores. The registry is not synchronized: share it read-only, or clone it per thread.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, RegisteredFunction>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in, bound to `settings` and `calculator`.
    pub fn with_builtins(settings: &EvalSettings, calculator: &CalculatorRef) -> Self {
        let context = Arc::new(FunctionContext::new(settings.clone(), calculator.clone()));
        let mut registry = Self::new();
        for builtin in iter_builtins() {
            let context = Arc::clone(&context);
            let implementation = builtin.implementation;
            let function = RegisteredFunction {
                name: builtin.name.to_string(),
                arity: builtin.arity,
                callable: Arc::new(move |args: &[BigDecimal]| implementation(&context, args)),
            };
            let previous = registry.functions.insert(builtin.name.to_string(), function);
            debug_assert!(previous.is_none(), "duplicate builtin {}", builtin.name);
        }
        registry
    }

    /// Add a function; fails if the name is invalid or already taken.
    pub fn register<F>(&mut self, name: &str, arity: usize, callable: F) -> CalcResult<()>
    where
        F: Fn(&[BigDecimal]) -> CalcResult<BigDecimal> + Send + Sync + 'static,
    {
        let name = validate_name(name)?;
        if self.functions.contains_key(&name) {
            return Err(CalcError::FunctionRegistration(format!(
                "function {name} is already registered"
            )));
        }
        self.insert(name, arity, Arc::new(callable));
        Ok(())
    }

    /// Register a function computed in `f64`. A non-finite result is an evaluation error.
    pub fn register_native<F>(&mut self, name: &str, arity: usize, f: F) -> CalcResult<()>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.register(name, arity, move |args: &[BigDecimal]| {
            let calculator = args
                .first()
                .map_or_else(default_calculator, |arg| arg.calculator().clone());
            let natives: Vec<f64> = args.iter().map(BigNumber::to_f64).collect();
            decimal_from_f64(f(&natives), &calculator)
        })
    }

    /// Add or overwrite a function, returning the one it replaced.
    pub fn replace<F>(
        &mut self,
        name: &str,
        arity: usize,
        callable: F,
    ) -> CalcResult<Option<RegisteredFunction>>
    where
        F: Fn(&[BigDecimal]) -> CalcResult<BigDecimal> + Send + Sync + 'static,
    {
        let name = validate_name(name)?;
        let previous = self.insert(name.clone(), arity, Arc::new(callable));
        if previous.is_some() {
            log::debug!("replaced function {name}");
        }
        Ok(previous)
    }

    pub fn remove(&mut self, name: &str) -> Option<RegisteredFunction> {
        let removed = self.functions.remove(&name.to_ascii_lowercase());
        if let Some(function) = &removed {
            log::debug!("removed function {}", function.name);
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredFunction> {
        self.functions.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn insert(
        &mut self,
        name: String,
        arity: usize,
        callable: Callable,
    ) -> Option<RegisteredFunction> {
        let function = RegisteredFunction {
            name: name.clone(),
            arity,
            callable,
        };
        self.functions.insert(name, function)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

fn validate_name(name: &str) -> CalcResult<String> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return Err(CalcError::FunctionRegistration(format!(
            "invalid function name {name:?}: only letters and underscores are allowed"
        )));
    }
    Ok(name.to_ascii_lowercase())
}

/// Convert a native result back into a decimal.
///
/// `f64`'s `Display` never uses exponent notation, so its output is always valid literal text.
pub(crate) fn decimal_from_f64(value: f64, calculator: &CalculatorRef) -> CalcResult<BigDecimal> {
    if !value.is_finite() {
        return Err(CalcError::evaluation("non-finite result"));
    }
    Ok(BigDecimal::of_with(value.to_string(), calculator)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::of(s).unwrap()
    }

    fn identity(args: &[BigDecimal]) -> CalcResult<BigDecimal> {
        Ok(args[0].clone())
    }

    #[test]
    fn rejects_duplicates_and_bad_names() {
        let mut registry = FunctionRegistry::new();
        registry.register("twice", 1, |args| Ok(args[0].plus(&args[0]))).unwrap();

        assert!(matches!(
            registry.register("TWICE", 1, identity),
            Err(CalcError::FunctionRegistration(_))
        ));
        for bad in ["", "log10", "my-fn", "a b"] {
            assert!(
                matches!(
                    registry.register(bad, 1, identity),
                    Err(CalcError::FunctionRegistration(_))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn replace_and_remove() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.replace("f", 1, identity).unwrap().is_none());
        let previous = registry
            .replace("F", 2, |args| Ok(args[0].plus(&args[1])))
            .unwrap()
            .unwrap();
        assert_eq!(previous.arity(), 1);
        assert_eq!(registry.get("f").unwrap().arity(), 2);

        assert!(registry.remove("f").is_some());
        assert!(registry.remove("f").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn call_checks_the_argument_count() {
        let mut registry = FunctionRegistry::new();
        registry.register("id", 1, identity).unwrap();
        let id = registry.get("ID").unwrap();
        assert_eq!(id.call(&[dec("2.5")]).unwrap(), dec("2.5"));
        assert!(matches!(id.call(&[]), Err(CalcError::Evaluation(_))));
    }

    #[test]
    fn native_functions_convert_through_f64() {
        let mut registry = FunctionRegistry::new();
        registry.register_native("hypot", 2, |a| a[0].hypot(a[1])).unwrap();
        registry.register_native("inf", 0, |_| f64::INFINITY).unwrap();

        let hypot = registry.get("hypot").unwrap();
        assert_eq!(hypot.call(&[dec("3"), dec("4")]).unwrap(), dec("5"));
        assert_eq!(
            registry.get("inf").unwrap().call(&[]),
            Err(CalcError::Evaluation("non-finite result".to_string()))
        );
    }

    #[test]
    fn builtins_are_collected() {
        let registry =
            FunctionRegistry::with_builtins(&EvalSettings::default(), &default_calculator());
        for name in ["sqrt", "ln", "log", "round", "weekday", "networkdays"] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
        assert_eq!(registry.get("log").unwrap().arity(), 2);
        assert_eq!(registry.len(), iter_builtins().count());
    }
}
