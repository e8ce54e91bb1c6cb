/// Initialization parameters for the headless driver.
///
/// The defaults mirror the minimums a desktop GL 4.5 context guarantees.
#[derive(Debug, Clone)]
pub struct HeadlessInit {
    /// Number of vertex attribute locations (`GL_MAX_VERTEX_ATTRIBS`).
    pub max_vertex_attribs: u32,

    /// Number of combined texture image units.
    pub max_texture_units: u32,

    /// Report deletes of names that are not alive as driver messages.
    ///
    /// Real drivers ignore these silently, but a double delete usually means
    /// the caller lost track of an object.
    pub report_double_delete: bool,
}

impl Default for HeadlessInit {
    fn default() -> Self {
        Self {
            max_vertex_attribs: 16,
            max_texture_units: 32,
            report_double_delete: true,
        }
    }
}
