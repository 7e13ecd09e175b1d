//! Conformance engine
//!
//! Everything that enters a managed object's graph goes through `admit`:
//!
//! 1. Guard: a raw managed object must be a master, and must not be (or
//!    contain) the host it is being attached to.
//! 2. State gate: the host must be transient.
//! 3. Conform: primitives pass through; managed objects are cloned if not
//!    transient and forced into slave mode; native containers are wrapped as
//!    managed containers; conversion hooks are invoked and their
//!    postconditions checked.
//!
//! The result is either a primitive or a transient slave, so the host's next
//! `finalize` locks it along with everything else.

use crate::containers::{ImmutableList, ImmutableMap, ImmutableSet};
use crate::contract::{Mode, State};
use crate::error::{Error, Result};
use crate::immutable::Immutable;
use crate::node::Managed;
use crate::value::{Input, Value};

/// Guard, gate and conform `input` for storage in `host`
pub(crate) fn admit(host: &Managed, input: Input) -> Result<Value> {
    guard(host, &input)?;
    host.read().ensure_transient()?;
    conform(input)
}

/// Reject raw slaves and inputs that would make `host` contain itself
pub(crate) fn guard(host: &Managed, input: &Input) -> Result<()> {
    match input {
        Input::Value(Value::Managed(m)) => {
            if m.mode() != Mode::Master {
                return Err(Error::OwnershipViolation(format!(
                    "cannot assign {} in slave mode; only master objects may be attached",
                    m.kind()
                )));
            }
            if m.reaches(host) {
                return Err(Error::OwnershipViolation(format!(
                    "attaching this {} would make the {} contain itself",
                    m.kind(),
                    host.kind()
                )));
            }
            Ok(())
        }
        Input::Map(entries) => entries.iter().try_for_each(|(_, v)| guard(host, v)),
        Input::List(items) | Input::Set(items) => items.iter().try_for_each(|v| guard(host, v)),
        Input::Value(_) | Input::Convert(_) => Ok(()),
    }
}

/// Convert an input into a storable value
///
/// Managed results are always transient slaves.
pub(crate) fn conform(input: Input) -> Result<Value> {
    match input {
        Input::Value(Value::Managed(m)) => {
            let m = if m.state() != State::Transient {
                m.deep_clone()
            } else {
                m
            };
            m.set_mode(Mode::Slave);
            Ok(Value::Managed(m))
        }
        Input::Value(primitive) => Ok(primitive),
        Input::Map(entries) => {
            let map = ImmutableMap::create()
                .mode(Mode::Slave)
                .finalize(false)
                .build(|map| {
                    for (key, value) in entries {
                        map.insert(key, value)?;
                    }
                    Ok(())
                })?;
            Ok(Value::Managed(map.into_managed()))
        }
        Input::List(items) => {
            let list = ImmutableList::create()
                .mode(Mode::Slave)
                .finalize(false)
                .build(|list| list.extend(items))?;
            Ok(Value::Managed(list.into_managed()))
        }
        Input::Set(items) => {
            let set = ImmutableSet::create()
                .mode(Mode::Slave)
                .finalize(false)
                .build(|set| set.union_update(items))?;
            Ok(Value::Managed(set.into_managed()))
        }
        Input::Convert(hook) => {
            let produced = hook.produce_immutable(Mode::Slave)?;
            check_produced(&produced)?;
            Ok(Value::Managed(produced))
        }
    }
}

/// Postconditions of a conversion hook
fn check_produced(produced: &Managed) -> Result<()> {
    if produced.state() != State::Transient {
        return Err(Error::ContractViolation(format!(
            "conversion hook returned a {} object; expected transient",
            produced.state()
        )));
    }
    if produced.mode() != Mode::Slave {
        return Err(Error::ContractViolation(format!(
            "conversion hook returned a {} object; expected slave",
            produced.mode()
        )));
    }
    if !produced.is_unshared() {
        return Err(Error::ContractViolation(
            "conversion hook returned a shared instance; it must produce a new object".to_string(),
        ));
    }
    Ok(())
}
