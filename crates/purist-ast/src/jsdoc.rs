/// Declarative purity annotations attached to a declaration.
///
/// Models the subset of documentation tags the analysis consults. A node with
/// no `JsDocInfo` at all is an undocumented declaration; a `JsDocInfo` with
/// every field at its default represents documentation that carries none of
/// the purity tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsDocInfo {
    /// `@modifies {this}`
    pub modifies_this: bool,
    /// `@modifies {arguments}`
    pub modifies_arguments: bool,
    /// `@throws` entries, one per declared thrown type.
    pub throws: Vec<String>,
    /// `@nosideeffects`
    pub no_side_effects: bool,
}

impl JsDocInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifies_this(mut self) -> Self {
        self.modifies_this = true;
        self
    }

    pub fn modifies_arguments(mut self) -> Self {
        self.modifies_arguments = true;
        self
    }

    pub fn throws(mut self, ty: impl Into<String>) -> Self {
        self.throws.push(ty.into());
        self
    }

    pub fn no_side_effects(mut self) -> Self {
        self.no_side_effects = true;
        self
    }
}
