//! Property data model: descriptors, observed state, actions and values.

pub mod action;
pub mod descriptor;
pub mod observed;
pub mod value;

pub use action::Action;
pub use descriptor::{Ensure, PropertyDescriptor, PropertyDescriptorBuilder};
pub use observed::ObservedProperty;
pub use value::{PropertyValue, ValueComparator, ValueComparison};
