//! `Reflect` for scalars, containers and pointers.
use std::sync::Arc;

use super::{Number, PrimitiveKind, Reflect, TypeInfo, TypeRef, Value};

macro_rules! impl_reflect_number {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Reflect for $ty {
            fn type_info() -> TypeInfo {
                TypeInfo::primitive::<Self>(PrimitiveKind::$kind)
            }
            fn reflect(&self) -> Value {
                Value::Number(Number::$kind(*self))
            }
        }
    )*};
}

impl_reflect_number! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    f32 => F32,
    f64 => F64,
}

impl Reflect for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::primitive::<Self>(PrimitiveKind::Bool)
    }
    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for String {
    fn type_info() -> TypeInfo {
        TypeInfo::primitive::<Self>(PrimitiveKind::String)
    }
    fn reflect(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self>(TypeRef::of::<T>())
    }
    fn reflect(&self) -> Value {
        Value::Array(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::optional::<Self>(TypeRef::of::<T>())
    }
    fn reflect(&self) -> Value {
        match self {
            Some(v) => v.reflect(),
            None => Value::Null,
        }
    }
}

// Pointers are transparent: `Box<i8>` and `i8` describe the same type.

impl<T: Reflect> Reflect for Box<T> {
    fn type_info() -> TypeInfo {
        T::type_info()
    }
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect> Reflect for Arc<T> {
    fn type_info() -> TypeInfo {
        T::type_info()
    }
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

/// Holds "any reflectable value"; the field needs a union declaration.
impl Reflect for Box<dyn Reflect> {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<dyn Reflect>("dyn Reflect")
    }
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

// ------------------------------- Tests ------------------------------------ //
