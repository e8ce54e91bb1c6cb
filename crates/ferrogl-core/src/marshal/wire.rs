use crate::types::WireKind;

/// Owned flat buffer of one primitive wire kind.
#[derive(Debug, Clone, PartialEq)]
pub enum WireData {
    Int(Vec<i32>),
    UInt(Vec<u32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

/// Borrowed view of a flat wire buffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WireSlice<'a> {
    Int(&'a [i32]),
    UInt(&'a [u32]),
    Float(&'a [f32]),
    Double(&'a [f64]),
}

/// Mutable view of a flat wire buffer, filled by uniform reads.
#[derive(Debug, PartialEq)]
pub enum WireSliceMut<'a> {
    Int(&'a mut [i32]),
    UInt(&'a mut [u32]),
    Float(&'a mut [f32]),
    Double(&'a mut [f64]),
}

impl WireData {
    pub fn zeroed(kind: WireKind, len: usize) -> Self {
        match kind {
            WireKind::Int => WireData::Int(vec![0; len]),
            WireKind::UInt => WireData::UInt(vec![0; len]),
            WireKind::Float => WireData::Float(vec![0.0; len]),
            WireKind::Double => WireData::Double(vec![0.0; len]),
        }
    }

    #[inline]
    pub fn kind(&self) -> WireKind {
        self.as_slice().kind()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> WireSlice<'_> {
        match self {
            WireData::Int(v) => WireSlice::Int(v),
            WireData::UInt(v) => WireSlice::UInt(v),
            WireData::Float(v) => WireSlice::Float(v),
            WireData::Double(v) => WireSlice::Double(v),
        }
    }

    pub fn as_mut_slice(&mut self) -> WireSliceMut<'_> {
        match self {
            WireData::Int(v) => WireSliceMut::Int(v),
            WireData::UInt(v) => WireSliceMut::UInt(v),
            WireData::Float(v) => WireSliceMut::Float(v),
            WireData::Double(v) => WireSliceMut::Double(v),
        }
    }
}

impl WireSlice<'_> {
    pub fn kind(&self) -> WireKind {
        match self {
            WireSlice::Int(_) => WireKind::Int,
            WireSlice::UInt(_) => WireKind::UInt,
            WireSlice::Float(_) => WireKind::Float,
            WireSlice::Double(_) => WireKind::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            WireSlice::Int(v) => v.len(),
            WireSlice::UInt(v) => v.len(),
            WireSlice::Float(v) => v.len(),
            WireSlice::Double(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WireSliceMut<'_> {
    pub fn kind(&self) -> WireKind {
        match self {
            WireSliceMut::Int(_) => WireKind::Int,
            WireSliceMut::UInt(_) => WireKind::UInt,
            WireSliceMut::Float(_) => WireKind::Float,
            WireSliceMut::Double(_) => WireKind::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            WireSliceMut::Int(v) => v.len(),
            WireSliceMut::UInt(v) => v.len(),
            WireSliceMut::Float(v) => v.len(),
            WireSliceMut::Double(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Primitive type that can live in a wire buffer.
pub trait WireElement: Copy + Default + PartialEq + std::fmt::Debug + 'static {
    const KIND: WireKind;

    fn wrap(values: Vec<Self>) -> WireData;
    fn unwrap_slice<'a>(slice: WireSlice<'a>) -> Option<&'a [Self]>;
}

macro_rules! impl_wire_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl WireElement for $ty {
            const KIND: WireKind = WireKind::$variant;

            #[inline]
            fn wrap(values: Vec<Self>) -> WireData {
                WireData::$variant(values)
            }

            #[inline]
            fn unwrap_slice<'a>(slice: WireSlice<'a>) -> Option<&'a [Self]> {
                match slice {
                    WireSlice::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    )*};
}

impl_wire_element!(i32 => Int, u32 => UInt, f32 => Float, f64 => Double);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_buffer_has_kind_and_length() {
        let data = WireData::zeroed(WireKind::Double, 6);
        assert_eq!(data.kind(), WireKind::Double);
        assert_eq!(data.len(), 6);
        assert_eq!(data, WireData::Double(vec![0.0; 6]));
    }

    #[test]
    fn unwrap_slice_checks_kind() {
        let data = WireData::Float(vec![1.0, 2.0]);
        assert_eq!(f32::unwrap_slice(data.as_slice()), Some(&[1.0f32, 2.0][..]));
        assert_eq!(i32::unwrap_slice(data.as_slice()), None);
    }
}
