use alloc::rc::Rc;
use alloc::sync::Arc;
use core::cell::RefCell;

use crate::descriptor::{Bind, Descriptor, Kind, WrapperKind};

impl<T: Bind> Bind for Option<T> {
    fn descriptor() -> Descriptor {
        Descriptor::new::<Self>(Kind::Wrapper(WrapperKind::option::<T>()))
    }
}

impl<T: Bind> Bind for Box<T> {
    fn descriptor() -> Descriptor {
        Descriptor::new::<Self>(Kind::Wrapper(WrapperKind::boxed::<T>()))
    }
}

impl<T: Bind> Bind for Rc<T> {
    fn descriptor() -> Descriptor {
        Descriptor::new::<Self>(Kind::Wrapper(WrapperKind::rc::<T>()))
    }
}

impl<T: Bind + Send + Sync> Bind for Arc<T> {
    fn descriptor() -> Descriptor {
        Descriptor::new::<Self>(Kind::Wrapper(WrapperKind::arc::<T>()))
    }
}

impl<T: Bind> Bind for RefCell<T> {
    fn descriptor() -> Descriptor {
        Descriptor::new::<Self>(Kind::Wrapper(WrapperKind::ref_cell::<T>()))
    }
}
