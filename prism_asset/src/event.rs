use crate::ResourceId;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mesh,
    Image,
    String,
    Shader,
    Material,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Mesh,
        ResourceKind::Image,
        ResourceKind::String,
        ResourceKind::Shader,
        ResourceKind::Material,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Mesh => "Mesh",
            ResourceKind::Image => "Image",
            ResourceKind::String => "String",
            ResourceKind::Shader => "Shader",
            ResourceKind::Material => "Material",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Create,
    /// The payload behind the id was replaced, consumers must re-resolve it.
    Change,
    Delete,
}

/// One store mutation, delivered to every listener.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResourceEvent {
    pub kind: ResourceKind,
    pub id: ResourceId,
    pub change: EventKind,
}

impl ResourceEvent {
    pub const fn new(kind: ResourceKind, id: ResourceId, change: EventKind) -> Self {
        Self { kind, id, change }
    }
}

impl Display for ResourceEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {} {}", self.change, self.kind, self.id)
    }
}
