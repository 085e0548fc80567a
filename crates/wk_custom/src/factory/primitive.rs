//! Built-in handling of the primitive wire types.

use alloc::boxed::Box;
use alloc::string::{String, ToString};

use wk_codec::WireValue;

use crate::error::SerializeError;
use crate::info::TypeInfo;
use crate::object::WireObject;

pub(crate) fn is_primitive(info: &TypeInfo) -> bool {
    info.is::<bool>()
        || info.is::<i32>()
        || info.is::<i64>()
        || info.is::<u64>()
        || info.is::<f64>()
        || info.is::<char>()
        || info.is::<String>()
}

pub(crate) fn to_wire(value: &dyn WireObject) -> Option<WireValue> {
    let any = value.as_any();
    if let Some(v) = any.downcast_ref::<bool>() {
        Some(WireValue::Bool(*v))
    } else if let Some(v) = any.downcast_ref::<i32>() {
        Some(WireValue::Int(*v))
    } else if let Some(v) = any.downcast_ref::<i64>() {
        Some(WireValue::Long(*v))
    } else if let Some(v) = any.downcast_ref::<u64>() {
        Some(WireValue::ULong(*v))
    } else if let Some(v) = any.downcast_ref::<f64>() {
        Some(WireValue::Double(*v))
    } else if let Some(v) = any.downcast_ref::<char>() {
        Some(WireValue::Char(*v))
    } else {
        any.downcast_ref::<String>()
            .map(|v| WireValue::String(v.clone()))
    }
}

pub(crate) fn from_wire(value: &WireValue) -> Result<Box<dyn WireObject>, SerializeError> {
    let object: Box<dyn WireObject> = match value {
        WireValue::Bool(v) => Box::new(*v),
        WireValue::Int(v) => Box::new(*v),
        WireValue::Long(v) => Box::new(*v),
        WireValue::ULong(v) => Box::new(*v),
        WireValue::Double(v) => Box::new(*v),
        WireValue::Char(v) => Box::new(*v),
        WireValue::String(v) => Box::new(v.clone()),
        WireValue::Symbol(v) => Box::new(String::from(v.as_str())),
        other => {
            return Err(SerializeError::NoSerializer {
                type_path: other.kind().to_string(),
            });
        }
    };
    Ok(object)
}
