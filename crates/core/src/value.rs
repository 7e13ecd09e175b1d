//! Value types for managed objects
//!
//! This module defines:
//! - `Value`: what a managed object stores (a primitive, or an owned slave)
//! - `Input`: what a caller offers to a setter before it is conformed
//! - `IntoImmutable`: opt-in conversion hook for foreign mutable types
//!
//! ## Primitive set
//!
//! Null, Bool, Int, Float, Decimal, String, Bytes, Date, Time, DateTime,
//! Duration. Primitives are immutable by construction and are stored
//! unchanged.
//!
//! ## Equality
//!
//! - Different primitive types are never equal: `Int(1) != Float(1.0)`
//! - Float uses IEEE-754 equality: `NaN != NaN`
//! - `Managed` values compare by identity, never by content

use crate::contract::{Kind, Mode};
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::node::Managed;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::ser::{Serialize, Serializer};
use std::any::Any;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A conformed value held by a managed object
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// Fixed-point decimal
    Decimal(Decimal),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// UTC datetime
    DateTime(DateTime<Utc>),
    /// Signed duration
    Duration(chrono::Duration),
    /// Owned sub-object, always in slave mode
    Managed(Managed),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Managed(a), Value::Managed(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Decimal(_) => "Decimal",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Date(_) => "Date",
            Value::Time(_) => "Time",
            Value::DateTime(_) => "DateTime",
            Value::Duration(_) => "Duration",
            Value::Managed(_) => "Managed",
        }
    }

    /// Check if this is a primitive (anything but a managed object)
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Managed(_))
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[u8] if this is a Bytes value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the managed handle if this is a sub-object
    pub fn as_managed(&self) -> Option<&Managed> {
        match self {
            Value::Managed(m) => Some(m),
            _ => None,
        }
    }

    /// Kind of the sub-object, if any
    pub fn managed_kind(&self) -> Option<Kind> {
        self.as_managed().map(Managed::kind)
    }

    /// Ordering class used to decide whether two values can be sorted together
    fn order_class(&self) -> Option<u8> {
        match self {
            Value::Int(_) | Value::Float(_) | Value::Decimal(_) => Some(0),
            Value::Bool(_) => Some(1),
            Value::String(_) => Some(2),
            Value::Bytes(_) => Some(3),
            Value::Date(_) => Some(4),
            Value::Time(_) => Some(5),
            Value::DateTime(_) => Some(6),
            Value::Duration(_) => Some(7),
            Value::Null | Value::Managed(_) => None,
        }
    }

    /// Check if two values share a total order
    pub fn is_comparable_with(&self, other: &Value) -> bool {
        match (self.order_class(), other.order_class()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Compare two values of the same ordering class
    ///
    /// Numbers compare across Int/Float/Decimal. Returns `None` for values
    /// without a common order (mixed classes, null, managed objects, NaN).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (Value::Decimal(a), Value::Int(b)) => Some(a.cmp(&Decimal::from(*b))),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Decimal(a), Value::Float(b)) => a.to_f64().partial_cmp(b),
            (Value::Float(a), Value::Decimal(b)) => a.partial_cmp(&b.to_f64()),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Duration(a), Value::Duration(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Date(d) => serializer.collect_str(d),
            Value::Time(t) => serializer.collect_str(t),
            Value::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Duration(d) => serializer.serialize_i64(d.num_milliseconds()),
            Value::Managed(m) => m.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Duration(d) => write!(f, "{}", d),
            Value::Managed(m) => write!(f, "<{} {} {}>", m.mode(), m.state(), m.kind()),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }

            impl From<$ty> for Input {
                fn from(v: $ty) -> Self {
                    Input::Value(Value::from(v))
                }
            }
        )*
    };
}

value_from! {
    bool => |b| Value::Bool(b),
    i64 => |i| Value::Int(i),
    i32 => |i| Value::Int(i as i64),
    u32 => |i| Value::Int(i as i64),
    f64 => |f| Value::Float(f),
    f32 => |f| Value::Float(f as f64),
    Decimal => |d| Value::Decimal(d),
    &str => |s| Value::String(s.to_string()),
    String => |s| Value::String(s),
    &[u8] => |b| Value::Bytes(b.to_vec()),
    NaiveDate => |d| Value::Date(d),
    NaiveTime => |t| Value::Time(t),
    DateTime<Utc> => |dt| Value::DateTime(dt),
    chrono::Duration => |d| Value::Duration(d),
    Managed => |m| Value::Managed(m),
}

// ============================================================================
// Input: values before conformance
// ============================================================================

/// Opt-in conversion for foreign mutable types
///
/// Implementors return a *new* managed object in the requested mode and in
/// the transient state. Returning a handle that is shared with anything else
/// (a cached instance, `self`'s own backing object) breaks single ownership
/// and is rejected with `Error::ContractViolation`.
pub trait IntoImmutable: Send + Sync {
    /// Produce a fresh transient immutable equivalent in `mode`
    fn produce_immutable(&self, mode: Mode) -> Result<Managed>;
}

/// A raw value offered to a setter
///
/// Every setter funnels its `Input` through conformance: primitives pass
/// through, managed objects become slaves (cloned first if not transient),
/// native containers are wrapped as managed containers, and conversion hooks
/// are invoked.
#[derive(Clone)]
pub enum Input {
    /// A primitive, or an existing managed object
    Value(Value),
    /// Native mapping, wrapped as a managed mapping
    Map(Vec<(String, Input)>),
    /// Native sequence, wrapped as a managed sequence
    List(Vec<Input>),
    /// Native set, wrapped as a managed set
    Set(Vec<Input>),
    /// Foreign type with a conversion hook
    Convert(Arc<dyn IntoImmutable>),
}

impl Input {
    /// Wrap a conversion hook
    pub fn convert<T: IntoImmutable + 'static>(hook: T) -> Self {
        Input::Convert(Arc::new(hook))
    }

    /// Bytes input (`Vec<u8>` converts as a sequence of integers otherwise)
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Input::Value(Value::Bytes(bytes.into()))
    }

    /// Copy with every managed object, at any depth, deep-cloned
    pub(crate) fn detached(&self) -> Input {
        match self {
            Input::Value(Value::Managed(m)) => Input::Value(Value::Managed(m.deep_clone())),
            Input::Map(entries) => Input::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.detached()))
                    .collect(),
            ),
            Input::List(items) => Input::List(items.iter().map(Input::detached).collect()),
            Input::Set(items) => Input::Set(items.iter().map(Input::detached).collect()),
            other => other.clone(),
        }
    }

    /// The managed object this input carries directly, if any
    pub fn as_managed(&self) -> Option<&Managed> {
        match self {
            Input::Value(Value::Managed(m)) => Some(m),
            _ => None,
        }
    }

    /// Classify a dynamically typed value
    ///
    /// Recognizes the primitive Rust types, `Value`, `Input`, `Managed`,
    /// and `serde_json::Value`. Anything else fails with
    /// `Error::Unconformable` naming the offending type.
    pub fn try_from_any<T: Any>(value: &T) -> Result<Input> {
        let any = value as &dyn Any;
        macro_rules! try_types {
            ($($ty:ty),*) => {
                $(
                    if let Some(v) = any.downcast_ref::<$ty>() {
                        return Ok(Input::from(v.clone()));
                    }
                )*
            };
        }
        try_types!(
            bool, i64, i32, u32, f64, f32, Decimal, String, &'static str, NaiveDate, NaiveTime,
            DateTime<Utc>, chrono::Duration, Managed, serde_json::Value
        );
        if let Some(v) = any.downcast_ref::<Value>() {
            return Ok(Input::Value(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<Input>() {
            return Ok(v.clone());
        }
        if let Some(v) = any.downcast_ref::<Vec<u8>>() {
            return Ok(Input::bytes(v.clone()));
        }
        if any.downcast_ref::<()>().is_some() {
            return Ok(Input::Value(Value::Null));
        }
        Err(Error::Unconformable(std::any::type_name::<T>().to_string()))
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Input::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Input::List(items) => f.debug_tuple("List").field(items).finish(),
            Input::Set(items) => f.debug_tuple("Set").field(items).finish(),
            Input::Convert(_) => f.write_str("Convert(..)"),
        }
    }
}

impl From<Value> for Input {
    fn from(v: Value) -> Self {
        Input::Value(v)
    }
}

impl From<()> for Input {
    fn from(_: ()) -> Self {
        Input::Value(Value::Null)
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Input::Value(Value::Null),
        }
    }
}

impl<T: Into<Input>> From<Vec<T>> for Input {
    fn from(items: Vec<T>) -> Self {
        Input::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Input>> From<BTreeMap<String, T>> for Input {
    fn from(map: BTreeMap<String, T>) -> Self {
        Input::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Input>> From<HashMap<String, T>> for Input {
    fn from(map: HashMap<String, T>) -> Self {
        Input::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Input> + Eq + Hash> From<HashSet<T>> for Input {
    fn from(set: HashSet<T>) -> Self {
        Input::Set(set.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Input> + Ord> From<BTreeSet<T>> for Input {
    fn from(set: BTreeSet<T>) -> Self {
        Input::Set(set.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Input {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Input::Value(Value::Null),
            Json::Bool(b) => b.into(),
            Json::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => n.as_f64().map(Input::from).unwrap_or(Input::Value(Value::Null)),
            },
            Json::String(s) => s.into(),
            Json::Array(items) => Input::List(items.into_iter().map(Input::from).collect()),
            Json::Object(map) => {
                Input::Map(map.into_iter().map(|(k, v)| (k, Input::from(v))).collect())
            }
        }
    }
}
