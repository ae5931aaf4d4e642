mod vec;

pub(crate) use vec::WakerVec;
