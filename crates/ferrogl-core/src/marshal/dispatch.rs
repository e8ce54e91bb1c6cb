use crate::api::{GraphicsApi, UniformTarget, UniformWrite};
use crate::error::{GlError, Result};
use crate::types::TypeDescriptor;

use super::{Uniform, WireData, WireElement, WireOf};

/// Matrix transpose flag used when a caller does not pass one.
///
/// `false` is the graphics API's own convention: flattened matrix data is read
/// column by column. Since [`Uniform`] flattens matrices row by row, a matrix
/// written with the default flag lands transposed in the shader; pass `true`
/// to have the driver transpose it back.
pub const DEFAULT_TRANSPOSE: bool = false;

/// Flattens `values` into one contiguous wire buffer, in order.
pub fn flatten<U: Uniform>(values: &[U]) -> WireData {
    let mut out = Vec::with_capacity(values.len() * U::TYPE.component_count());
    for value in values {
        value.flatten_into(&mut out);
    }
    <WireOf<U> as WireElement>::wrap(out)
}

/// Rebuilds values from a wire buffer produced by [`flatten`] or a uniform read.
pub fn unflatten<U: Uniform>(data: &WireData) -> Result<Vec<U>> {
    let Some(wire) = <WireOf<U> as WireElement>::unwrap_slice(data.as_slice()) else {
        return Err(GlError::unsupported(
            U::TYPE.glsl_name(),
            format!(
                "expected {} wire data, got {}",
                <WireOf<U> as WireElement>::KIND.name(),
                data.kind().name()
            ),
        ));
    };

    let n = U::TYPE.component_count();
    if wire.len() % n != 0 {
        return Err(GlError::unsupported(
            U::TYPE.glsl_name(),
            format!("{} wire elements is not a multiple of {n}", wire.len()),
        ));
    }

    Ok(wire.chunks_exact(n).map(U::unflatten_from).collect())
}

/// Writes `values` to `target`. A single value writes a plain uniform, more
/// than one writes consecutive array elements starting at `target.location`.
pub fn write<U: Uniform>(
    gl: &mut dyn GraphicsApi,
    target: UniformTarget,
    values: &[U],
    transpose: bool,
) -> Result<()> {
    if values.is_empty() {
        return Err(empty_array(&U::TYPE.glsl_name()));
    }
    let data = flatten(values);
    let command = UniformWrite::new(U::TYPE, data.as_slice(), transpose)?;
    log::trace!("{} at location {} ({} values)", command.entry_point(), target.location, values.len());
    gl.program_uniform(target, command);
    Ok(())
}

/// Reads `count` consecutive values of type `U` starting at `target.location`.
pub fn read<U: Uniform>(gl: &mut dyn GraphicsApi, target: UniformTarget, count: usize) -> Result<Vec<U>> {
    if count == 0 {
        return Err(empty_array(&U::TYPE.glsl_name()));
    }
    let mut data = WireData::zeroed(U::TYPE.kind().wire_kind(), count * U::TYPE.component_count());
    gl.get_uniform(target, data.as_mut_slice());
    unflatten(&data)
}

/// Writes pre-flattened data described by `descriptor`.
///
/// The wire kind and exact element count are checked against the descriptor
/// before the driver is called.
pub fn write_raw(
    gl: &mut dyn GraphicsApi,
    target: UniformTarget,
    descriptor: &TypeDescriptor,
    data: &WireData,
    transpose: bool,
) -> Result<()> {
    check_raw(descriptor, data)?;
    let command = UniformWrite::new(descriptor.element_type(), data.as_slice(), transpose)?;
    log::trace!("{} at location {} (raw {descriptor})", command.entry_point(), target.location);
    gl.program_uniform(target, command);
    Ok(())
}

/// Reads the value described by `descriptor` without reconstructing host values.
///
/// Booleans come back as the raw integers the driver stores.
pub fn read_raw(gl: &mut dyn GraphicsApi, target: UniformTarget, descriptor: &TypeDescriptor) -> Result<WireData> {
    let mut data = WireData::zeroed(descriptor.kind().wire_kind(), descriptor.flat_len());
    gl.get_uniform(target, data.as_mut_slice());
    Ok(data)
}

pub(crate) fn check_raw(descriptor: &TypeDescriptor, data: &WireData) -> Result<()> {
    let expected = descriptor.kind().wire_kind();
    if data.kind() != expected {
        return Err(GlError::unsupported(
            descriptor.glsl_name(),
            format!("expected {} wire data, got {}", expected.name(), data.kind().name()),
        ));
    }
    if data.len() != descriptor.flat_len() {
        return Err(GlError::unsupported(
            descriptor.glsl_name(),
            format!("expected {} wire elements, got {}", descriptor.flat_len(), data.len()),
        ));
    }
    Ok(())
}

pub(crate) fn empty_array(type_name: &str) -> GlError {
    GlError::unsupported(format!("{type_name}[0]"), "arrays must hold at least one element")
}
