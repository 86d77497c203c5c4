/// Fully-qualified type names.
///
/// Defines `TypeName`, the `::`-separated key every registry uses, and the
/// derived-from relation between an enum and its variants.
pub mod type_name;

/// The type registry.
///
/// Maps type names to builtin types, structs and enums, and builds the
/// default value of a type.
pub mod registry;

/// Type collection.
///
/// Populates the registry from a module's struct and enum declarations.
pub mod collector;
