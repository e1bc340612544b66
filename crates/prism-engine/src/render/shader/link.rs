use std::collections::BTreeMap;

use naga::{Binding, Handle, Module, Type, TypeInner};

use crate::render::mesh::AttributeLocations;
use crate::render::{InitError, ShaderStage};

use super::CompiledStage;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Bind group and binding index of a shader resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct ResourceSlot {
    pub group: u32,
    pub binding: u32,
}

/// Attribute locations and resource slots resolved by name at link time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProgramBindings {
    pub attributes: AttributeLocations,
    /// `Matrices { P, M, N }` uniform block.
    pub matrices: ResourceSlot,
    pub texture: ResourceSlot,
    pub sampler: ResourceSlot,
}

/// Two stages that passed the link checks, plus their resolved bindings.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    vertex: Module,
    fragment: Module,
    bindings: ProgramBindings,
}

impl LinkedProgram {
    pub fn vertex_module(&self) -> &Module {
        &self.vertex
    }

    pub fn fragment_module(&self) -> &Module {
        &self.fragment
    }

    pub fn bindings(&self) -> &ProgramBindings {
        &self.bindings
    }

    pub fn vertex_entry(&self) -> &'static str {
        VERTEX_ENTRY
    }

    pub fn fragment_entry(&self) -> &'static str {
        FRAGMENT_ENTRY
    }
}

/// Links a vertex and a fragment stage into a program.
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<LinkedProgram, InitError> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(InitError::link(format!(
            "expected a vertex and a fragment stage, got {} and {}",
            vertex.stage, fragment.stage
        )));
    }

    let vs = find_entry(&vertex.module, ShaderStage::Vertex, VERTEX_ENTRY)?;
    let fs = find_entry(&fragment.module, ShaderStage::Fragment, FRAGMENT_ENTRY)?;

    check_interface(&vertex.module, vs, &fragment.module, fs)?;
    check_shared_resources(&vertex.module, &fragment.module)?;
    let bindings = resolve_bindings(&vertex.module, vs, &fragment.module)?;

    log::debug!("linked shader program: {bindings:?}");

    Ok(LinkedProgram {
        vertex: vertex.module,
        fragment: fragment.module,
        bindings,
    })
}

fn find_entry<'m>(
    module: &'m Module,
    stage: ShaderStage,
    name: &str,
) -> Result<&'m naga::EntryPoint, InitError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage.naga())
        .ok_or_else(|| InitError::link(format!("no {stage} entry point `{name}`")))
}

/// A user-defined (location-bound) stage input or output.
#[derive(Debug, Clone)]
struct Varying {
    name: String,
    location: u32,
    ty: TypeInner,
}

fn collect_varyings(
    module: &Module,
    name: Option<&str>,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Varying {
            name: name.unwrap_or("<unnamed>").to_string(),
            location: *location,
            ty: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_varyings(module, m.name.as_deref(), m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn entry_inputs(module: &Module, ep: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        collect_varyings(module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn entry_outputs(module: &Module, ep: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    if let Some(result) = &ep.function.result {
        collect_varyings(module, None, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// Every fragment input must be written by the vertex stage with the same type.
fn check_interface(
    vs_module: &Module,
    vs: &naga::EntryPoint,
    fs_module: &Module,
    fs: &naga::EntryPoint,
) -> Result<(), InitError> {
    let outputs: BTreeMap<u32, Varying> = entry_outputs(vs_module, vs)
        .into_iter()
        .map(|v| (v.location, v))
        .collect();

    for input in entry_inputs(fs_module, fs) {
        let Some(output) = outputs.get(&input.location) else {
            return Err(InitError::link(format!(
                "fragment input `{}` at location {} is not written by the vertex stage",
                input.name, input.location
            )));
        };
        if output.ty != input.ty {
            return Err(InitError::link(format!(
                "location {}: vertex output `{}` is {:?} but fragment input `{}` is {:?}",
                input.location, output.name, output.ty, input.name, input.ty
            )));
        }
    }
    Ok(())
}

/// Shape of a bound resource, comparable across modules.
#[derive(Debug, Clone, PartialEq)]
enum ResourceShape {
    Block(Vec<(Option<String>, u32, TypeInner)>),
    Other(TypeInner),
}

fn resource_shape(module: &Module, ty: Handle<Type>) -> ResourceShape {
    match &module.types[ty].inner {
        TypeInner::Struct { members, .. } => ResourceShape::Block(
            members
                .iter()
                .map(|m| (m.name.clone(), m.offset, module.types[m.ty].inner.clone()))
                .collect(),
        ),
        other => ResourceShape::Other(other.clone()),
    }
}

fn bound_resources(
    module: &Module,
) -> BTreeMap<ResourceSlot, (&naga::GlobalVariable, ResourceShape)> {
    module
        .global_variables
        .iter()
        .filter_map(|(_, var)| {
            let rb = var.binding.as_ref()?;
            let slot = ResourceSlot {
                group: rb.group,
                binding: rb.binding,
            };
            Some((slot, (var, resource_shape(module, var.ty))))
        })
        .collect()
}

/// Resources declared by both stages must agree on their layout.
fn check_shared_resources(vs_module: &Module, fs_module: &Module) -> Result<(), InitError> {
    let vs_resources = bound_resources(vs_module);
    for (slot, (fs_var, fs_shape)) in bound_resources(fs_module) {
        let Some((_, vs_shape)) = vs_resources.get(&slot) else {
            continue;
        };
        if *vs_shape != fs_shape {
            return Err(InitError::link(format!(
                "resource `{}` at group {} binding {} is declared differently in the two stages",
                fs_var.name.as_deref().unwrap_or("<unnamed>"),
                slot.group,
                slot.binding
            )));
        }
    }
    Ok(())
}

const VEC2_F32: TypeInner = TypeInner::Vector {
    size: naga::VectorSize::Bi,
    scalar: naga::Scalar::F32,
};
const VEC3_F32: TypeInner = TypeInner::Vector {
    size: naga::VectorSize::Tri,
    scalar: naga::Scalar::F32,
};
const MAT4_F32: TypeInner = TypeInner::Matrix {
    columns: naga::VectorSize::Quad,
    rows: naga::VectorSize::Quad,
    scalar: naga::Scalar::F32,
};

fn resolve_attribute(inputs: &[Varying], name: &str, ty: &TypeInner) -> Result<u32, InitError> {
    let input = inputs
        .iter()
        .find(|v| v.name == name)
        .ok_or_else(|| InitError::link(format!("vertex input `{name}` not found")))?;
    if input.ty != *ty {
        return Err(InitError::link(format!(
            "vertex input `{name}` has type {:?}, expected {ty:?}",
            input.ty
        )));
    }
    Ok(input.location)
}

/// Finds the uniform block with members `P`, `M`, `N` laid out as three
/// consecutive `mat4x4<f32>`.
fn resolve_matrices(modules: [&Module; 2]) -> Result<ResourceSlot, InitError> {
    const EXPECTED: [(&str, u32); 3] = [("P", 0), ("M", 64), ("N", 128)];

    for module in modules {
        for (slot, (var, shape)) in bound_resources(module) {
            if var.space != naga::AddressSpace::Uniform {
                continue;
            }
            let ResourceShape::Block(members) = shape else {
                continue;
            };
            let names_match = members.len() == EXPECTED.len()
                && members
                    .iter()
                    .zip(EXPECTED)
                    .all(|((name, _, _), (want, _))| name.as_deref() == Some(want));
            if !names_match {
                continue;
            }
            let layout_ok = members
                .iter()
                .zip(EXPECTED)
                .all(|((_, offset, ty), (_, want))| *offset == want && *ty == MAT4_F32);
            if !layout_ok {
                return Err(InitError::link(
                    "uniform block `P, M, N` must be three consecutive mat4x4<f32>",
                ));
            }
            return Ok(slot);
        }
    }
    Err(InitError::link("uniform block with members `P`, `M`, `N` not found"))
}

fn resolve_global(
    module: &Module,
    name: &str,
    accept: impl Fn(&TypeInner) -> bool,
) -> Result<ResourceSlot, InitError> {
    let (_, var) = module
        .global_variables
        .iter()
        .find(|(_, var)| var.name.as_deref() == Some(name))
        .ok_or_else(|| InitError::link(format!("fragment resource `{name}` not found")))?;
    if !accept(&module.types[var.ty].inner) {
        return Err(InitError::link(format!("fragment resource `{name}` has the wrong type")));
    }
    let rb = var
        .binding
        .as_ref()
        .ok_or_else(|| InitError::link(format!("fragment resource `{name}` has no binding")))?;
    Ok(ResourceSlot {
        group: rb.group,
        binding: rb.binding,
    })
}

fn resolve_bindings(
    vs_module: &Module,
    vs: &naga::EntryPoint,
    fs_module: &Module,
) -> Result<ProgramBindings, InitError> {
    let inputs = entry_inputs(vs_module, vs);
    let attributes = AttributeLocations {
        position: resolve_attribute(&inputs, "position", &VEC3_F32)?,
        normal: resolve_attribute(&inputs, "normal", &VEC3_F32)?,
        tex: resolve_attribute(&inputs, "tex", &VEC2_F32)?,
    };

    let matrices = resolve_matrices([vs_module, fs_module])?;
    let texture = resolve_global(fs_module, "diffuse_texture", |ty| {
        matches!(
            ty,
            TypeInner::Image {
                dim: naga::ImageDimension::D2,
                arrayed: false,
                ..
            }
        )
    })?;
    let sampler = resolve_global(fs_module, "diffuse_sampler", |ty| {
        matches!(ty, TypeInner::Sampler { comparison: false })
    })?;

    // The pipeline layout is [matrices group, texture group].
    if matrices.group != 0 || texture.group != 1 || sampler.group != 1 {
        return Err(InitError::link(format!(
            "expected matrices in group 0 and texture/sampler in group 1, got {}, {} and {}",
            matrices.group, texture.group, sampler.group
        )));
    }

    Ok(ProgramBindings {
        attributes,
        matrices,
        texture,
        sampler,
    })
}
