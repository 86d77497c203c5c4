use std::{collections::HashMap, fmt, hash::Hash};

use tracing::debug;

use crate::{
    ast::{BinaryOperator, BoolOperator, CompareOperator, UnaryOperator},
    error::{Panic, RuntimeError},
    interpreter::{
        operations::{arithmetic, cast, comparison, logic, unary},
        types::type_name::TypeName,
        value::core::Value,
    },
};

/// Handler of a two-operand operation.
pub type BinaryHandler = fn(&Value, &Value) -> Result<Value, Panic>;

/// Handler of a unary operation or a cast.
pub type UnaryHandler = fn(&Value) -> Result<Value, Panic>;

/// A registered two-operand operation.
#[derive(Debug, Clone)]
pub struct BinaryImplementation {
    /// Type of the values the handler produces.
    pub result:  TypeName,
    /// The native implementation.
    pub handler: BinaryHandler,
}

/// A registered unary operation.
#[derive(Debug, Clone)]
pub struct UnaryImplementation {
    /// Type of the values the handler produces.
    pub result:  TypeName,
    /// The native implementation.
    pub handler: UnaryHandler,
}

/// A registered conversion to `target`.
#[derive(Debug, Clone)]
pub struct CastImplementation {
    /// The type converted to.
    pub target:  TypeName,
    /// The native implementation.
    pub handler: UnaryHandler,
}

/// How a value of one type becomes a value of another.
#[derive(Debug, Clone, Copy)]
pub enum Conversion<'r> {
    /// The source already derives from the target; the value is kept.
    Identity,
    /// A registered cast.
    Cast(&'r CastImplementation),
}

impl Conversion<'_> {
    /// Converts a value.
    ///
    /// # Errors
    /// The cast handler's panic, e.g. for an unparsable string.
    pub fn apply(&self, value: Value) -> Result<Value, Panic> {
        match self {
            Self::Identity => Ok(value),
            Self::Cast(cast) => (cast.handler)(&value),
        }
    }
}

/// A two-operand lookup result: the implementation to run and the implicit
/// cast to apply to the right operand first, if any.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedBinary<'r> {
    /// The implementation keyed by the left type and the (cast) right type.
    pub implementation: &'r BinaryImplementation,
    /// The conversion of the right operand.
    pub right_cast:     Option<&'r CastImplementation>,
}

impl ResolvedBinary<'_> {
    /// Type of the values the operation produces.
    #[must_use]
    pub const fn result(&self) -> &TypeName {
        &self.implementation.result
    }

    /// Runs the operation, casting the right operand first if needed.
    ///
    /// # Errors
    /// A panic from the cast or from the operation itself.
    pub fn apply(&self, left: &Value, right: Value) -> Result<Value, Panic> {
        let right = match self.right_cast {
            Some(cast) => (cast.handler)(&right)?,
            None => right,
        };
        (self.implementation.handler)(left, &right)
    }
}

/// One table of two-operand operations, keyed by operator and operand types.
#[derive(Debug, Clone)]
struct BinaryTable<O> {
    entries: HashMap<(O, TypeName, TypeName), BinaryImplementation>,
}

impl<O> Default for BinaryTable<O> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<O: Copy + Eq + Hash + fmt::Display> BinaryTable<O> {
    fn register(&mut self,
                op: O,
                left: TypeName,
                right: TypeName,
                implementation: BinaryImplementation)
                -> Result<(), RuntimeError> {
        let key = (op, left, right);
        if self.entries.contains_key(&key) {
            return Err(RuntimeError::OperationAlreadyRegistered { operation:
                                                                      describe_binary(key.0,
                                                                                      &key.1,
                                                                                      &key.2), });
        }
        debug!(operation = %describe_binary(key.0, &key.1, &key.2), "registered operation");
        self.entries.insert(key, implementation);
        Ok(())
    }

    fn get(&self, op: O, left: &TypeName, right: &TypeName) -> Option<&BinaryImplementation> {
        self.entries.get(&(op, left.clone(), right.clone()))
    }
}

/// Human-readable description of a two-operand operation, for errors.
pub fn describe_binary(op: impl fmt::Display, left: &TypeName, right: &TypeName) -> String {
    format!("'{left} {op} {right}'")
}

/// Human-readable description of a unary operation, for errors.
pub fn describe_unary(op: UnaryOperator, operand: &TypeName) -> String {
    format!("'{op}{operand}'")
}

/// Human-readable description of a cast, for errors.
pub fn describe_cast(from: &TypeName, to: &TypeName) -> String {
    format!("'{from} as {to}'")
}

/// The dispatch tables for every operator and cast.
///
/// Two-operand lookups first try the exact `(left, right)` key. Failing that,
/// the right operand is implicitly cast to the first registered target for
/// which `(left, target)` has an implementation.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    bool_ops:    BinaryTable<BoolOperator>,
    compare_ops: BinaryTable<CompareOperator>,
    binary_ops:  BinaryTable<BinaryOperator>,
    unary_ops:   HashMap<(UnaryOperator, TypeName), UnaryImplementation>,
    cast_ops:    HashMap<TypeName, Vec<CastImplementation>>,
}

impl OperationRegistry {
    /// Creates a registry with no operations at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the builtin operations on `i32`, `f32`,
    /// `str` and `bool`.
    ///
    /// # Errors
    /// `OperationAlreadyRegistered` if the builtin set registers a key twice.
    ///
    /// # Example
    /// ```
    /// use fhll::{
    ///     ast::BinaryOperator,
    ///     interpreter::{operations::registry::OperationRegistry, types::type_name::TypeName},
    /// };
    ///
    /// let operations = OperationRegistry::with_builtins().unwrap();
    /// let i32 = TypeName::simple("i32");
    /// let sum = operations.find_binary(BinaryOperator::Add, &i32, &i32).unwrap();
    ///
    /// assert_eq!(sum.result(), &i32);
    /// ```
    pub fn with_builtins() -> Result<Self, RuntimeError> {
        let mut registry = Self::empty();
        cast::register(&mut registry)?;
        logic::register(&mut registry)?;
        comparison::register(&mut registry)?;
        arithmetic::register(&mut registry)?;
        unary::register(&mut registry)?;
        Ok(registry)
    }

    /// Registers `left op right` for `&&`/`||`.
    ///
    /// # Errors
    /// `OperationAlreadyRegistered` for a duplicate key.
    pub fn register_bool(&mut self,
                         op: BoolOperator,
                         left: TypeName,
                         right: TypeName,
                         result: TypeName,
                         handler: BinaryHandler)
                         -> Result<(), RuntimeError> {
        self.bool_ops
            .register(op, left, right, BinaryImplementation { result, handler })
    }

    /// Registers a comparison; comparisons always produce `bool`.
    ///
    /// # Errors
    /// `OperationAlreadyRegistered` for a duplicate key.
    pub fn register_compare(&mut self,
                            op: CompareOperator,
                            left: TypeName,
                            right: TypeName,
                            handler: BinaryHandler)
                            -> Result<(), RuntimeError> {
        let result = TypeName::simple("bool");
        self.compare_ops
            .register(op, left, right, BinaryImplementation { result, handler })
    }

    /// Registers an arithmetic operation.
    ///
    /// # Errors
    /// `OperationAlreadyRegistered` for a duplicate key.
    pub fn register_binary(&mut self,
                           op: BinaryOperator,
                           left: TypeName,
                           right: TypeName,
                           result: TypeName,
                           handler: BinaryHandler)
                           -> Result<(), RuntimeError> {
        self.binary_ops
            .register(op, left, right, BinaryImplementation { result, handler })
    }

    /// Registers a prefix operation.
    ///
    /// # Errors
    /// `OperationAlreadyRegistered` for a duplicate key.
    pub fn register_unary(&mut self,
                          op: UnaryOperator,
                          operand: TypeName,
                          result: TypeName,
                          handler: UnaryHandler)
                          -> Result<(), RuntimeError> {
        let key = (op, operand);
        if self.unary_ops.contains_key(&key) {
            return Err(RuntimeError::OperationAlreadyRegistered { operation: describe_unary(key.0,
                                                                                            &key.1), });
        }
        debug!(operation = %describe_unary(key.0, &key.1), "registered operation");
        self.unary_ops.insert(key, UnaryImplementation { result, handler });
        Ok(())
    }

    /// Registers a cast. Casts of one source type are tried in registration
    /// order by the implicit right-operand conversion.
    ///
    /// # Errors
    /// `OperationAlreadyRegistered` for a duplicate pair.
    pub fn register_cast(&mut self,
                         from: TypeName,
                         to: TypeName,
                         handler: UnaryHandler)
                         -> Result<(), RuntimeError> {
        let casts = self.cast_ops.entry(from).or_default();
        if casts.iter().any(|cast| cast.target == to) {
            return Err(RuntimeError::OperationAlreadyRegistered { operation: format!("cast to '{to}'") });
        }
        debug!(target = %to, "registered cast");
        casts.push(CastImplementation { target: to,
                                        handler });
        Ok(())
    }

    fn resolve<'r, O>(&'r self,
                      table: &'r BinaryTable<O>,
                      op: O,
                      left: &TypeName,
                      right: &TypeName)
                      -> Option<ResolvedBinary<'r>>
        where O: Copy + Eq + Hash + fmt::Display
    {
        if let Some(implementation) = table.get(op, left, right) {
            return Some(ResolvedBinary { implementation,
                                         right_cast: None });
        }
        self.cast_ops.get(right)?.iter().find_map(|cast| {
                                            table.get(op, left, &cast.target)
                                                 .map(|implementation| ResolvedBinary { implementation,
                                                                                        right_cast:
                                                                                            Some(cast) })
                                        })
    }

    /// Looks up `left && right` or `left || right`.
    #[must_use]
    pub fn find_bool(&self,
                     op: BoolOperator,
                     left: &TypeName,
                     right: &TypeName)
                     -> Option<ResolvedBinary<'_>> {
        self.resolve(&self.bool_ops, op, left, right)
    }

    /// Looks up a comparison.
    #[must_use]
    pub fn find_compare(&self,
                        op: CompareOperator,
                        left: &TypeName,
                        right: &TypeName)
                        -> Option<ResolvedBinary<'_>> {
        self.resolve(&self.compare_ops, op, left, right)
    }

    /// Looks up an arithmetic operation.
    #[must_use]
    pub fn find_binary(&self,
                       op: BinaryOperator,
                       left: &TypeName,
                       right: &TypeName)
                       -> Option<ResolvedBinary<'_>> {
        self.resolve(&self.binary_ops, op, left, right)
    }

    /// Looks up a prefix operation.
    #[must_use]
    pub fn find_unary(&self, op: UnaryOperator, operand: &TypeName) -> Option<&UnaryImplementation> {
        self.unary_ops.get(&(op, operand.clone()))
    }

    /// Finds how to turn a `from` value into a `to` value.
    ///
    /// A type converts to any type it derives from without a handler.
    #[must_use]
    pub fn find_cast(&self, from: &TypeName, to: &TypeName) -> Option<Conversion<'_>> {
        if from.is_derived_from(to) {
            return Some(Conversion::Identity);
        }
        self.cast_ops
            .get(from)?
            .iter()
            .find(|cast| &cast.target == to)
            .map(Conversion::Cast)
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversion, OperationRegistry};
    use crate::{
        ast::{BinaryOperator, BoolOperator, CompareOperator, UnaryOperator},
        error::RuntimeError,
        interpreter::{types::type_name::TypeName, value::core::Value},
    };

    fn name(s: &str) -> TypeName {
        TypeName::parse(s).unwrap()
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut registry = OperationRegistry::with_builtins().unwrap();
        let err = registry.register_binary(BinaryOperator::Add,
                                           name("i32"),
                                           name("i32"),
                                           name("i32"),
                                           |l, _| Ok(l.clone()))
                          .unwrap_err();
        assert!(matches!(err, RuntimeError::OperationAlreadyRegistered { .. }));

        let err = registry.register_cast(name("i32"), name("str"), |v| Ok(v.clone()))
                          .unwrap_err();
        assert!(matches!(err, RuntimeError::OperationAlreadyRegistered { .. }));
    }

    #[test]
    fn exact_match_wins() {
        let registry = OperationRegistry::with_builtins().unwrap();
        let resolved = registry.find_binary(BinaryOperator::Add, &name("str"), &name("str"))
                               .unwrap();
        assert!(resolved.right_cast.is_none());
        let joined = resolved.apply(&Value::from("ab"), Value::from("cd")).unwrap();
        assert_eq!(joined, Value::from("abcd"));
    }

    #[test]
    fn right_operand_is_cast_to_the_first_fitting_target() {
        let registry = OperationRegistry::with_builtins().unwrap();

        let resolved = registry.find_binary(BinaryOperator::Add, &name("f32"), &name("i32"))
                               .unwrap();
        assert_eq!(resolved.result(), &name("f32"));
        assert_eq!(resolved.apply(&Value::F32(0.5), Value::I32(2)).unwrap(), Value::F32(2.5));

        let resolved = registry.find_binary(BinaryOperator::Add, &name("str"), &name("i32"))
                               .unwrap();
        assert_eq!(resolved.apply(&Value::from("n="), Value::I32(5)).unwrap(),
                   Value::from("n=5"));
    }

    #[test]
    fn missing_operations_are_none() {
        let registry = OperationRegistry::with_builtins().unwrap();
        assert!(registry.find_compare(CompareOperator::Less, &name("str"), &name("str"))
                        .is_none());
        assert!(registry.find_unary(UnaryOperator::Not, &name("i32")).is_none());
        assert!(registry.find_bool(BoolOperator::And, &name("Shape"), &name("Shape"))
                        .is_none());
    }

    #[test]
    fn casts_to_a_base_type_are_identity() {
        let registry = OperationRegistry::with_builtins().unwrap();
        assert!(matches!(registry.find_cast(&name("Shape::Circle"), &name("Shape")),
                         Some(Conversion::Identity)));
        assert!(registry.find_cast(&name("Shape"), &name("Shape::Circle")).is_none());
        assert!(matches!(registry.find_cast(&name("i32"), &name("i32")),
                         Some(Conversion::Identity)));
    }
}
