use bytes::Bytes;
use sp_policy::Bounds;

use crate::descriptor::{Bind, DecimalKind, Descriptor, IntegerKind, Kind};

impl Bind for bool {
    fn descriptor() -> Descriptor {
        Descriptor::new::<bool>(Kind::Bool)
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bind for $ty {
                fn descriptor() -> Descriptor {
                    let natural = Bounds::new(<$ty>::MIN as i64, <$ty>::MAX as i64);
                    Descriptor::new::<$ty>(Kind::Integer(IntegerKind::of::<$ty>(natural)))
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl Bind for f32 {
    fn descriptor() -> Descriptor {
        Descriptor::new::<f32>(Kind::Decimal(DecimalKind::of::<f32>()))
    }
}

impl Bind for f64 {
    fn descriptor() -> Descriptor {
        Descriptor::new::<f64>(Kind::Decimal(DecimalKind::of::<f64>()))
    }
}

impl Bind for String {
    fn descriptor() -> Descriptor {
        Descriptor::new::<String>(Kind::String)
    }
}

impl Bind for Bytes {
    fn descriptor() -> Descriptor {
        Descriptor::new::<Bytes>(Kind::Bytes)
    }
}

#[cfg(test)]
mod tests {
    use sp_policy::Bounds;

    use crate::descriptor::{Bind, Kind};

    #[test]
    fn integers_carry_their_natural_range() {
        match u8::descriptor().kind() {
            Kind::Integer(kind) => assert_eq!(kind.bounds(), Bounds::new(0, 255)),
            _ => panic!("u8 is not an integer"),
        }
        match i64::descriptor().kind() {
            Kind::Integer(kind) => assert_eq!(kind.bounds(), Bounds::I64),
            _ => panic!("i64 is not an integer"),
        }
    }
}
