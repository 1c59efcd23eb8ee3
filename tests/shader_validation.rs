//! Parse and validate the WGSL shipped with the crate.
//!
//! These run without a GPU: naga checks syntax, types and the pipeline
//! interface, and the uniform layouts are compared with the Rust structs.

use evergreen::foliage::FoliageParticle;
use evergreen::gpu::mesh::MeshVertex;
use evergreen::shader::{FoliageUniforms, SceneUniforms, FOLIAGE_SOURCE, ORNAMENT_SOURCE};
use evergreen::OrnamentInstance;

fn parse_and_validate(code: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(code).unwrap_or_else(|e| panic!("WGSL parse error: {e:?}"));

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator
        .validate(&module)
        .unwrap_or_else(|e| panic!("WGSL validation error: {e:?}"));

    module
}

fn struct_size(module: &naga::Module, name: &str) -> u32 {
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("struct {name} not found"));
    ty.inner.size(module.to_ctx())
}

fn entry_points(module: &naga::Module) -> Vec<(&str, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect()
}

#[test]
fn test_foliage_shader_validates() {
    let module = parse_and_validate(FOLIAGE_SOURCE);
    assert_eq!(
        entry_points(&module),
        vec![("vs_main", naga::ShaderStage::Vertex), ("fs_main", naga::ShaderStage::Fragment)]
    );
}

#[test]
fn test_ornament_shader_validates() {
    let module = parse_and_validate(ORNAMENT_SOURCE);
    assert_eq!(
        entry_points(&module),
        vec![("vs_main", naga::ShaderStage::Vertex), ("fs_main", naga::ShaderStage::Fragment)]
    );
}

#[test]
fn test_uniform_layouts_match() {
    let foliage = parse_and_validate(FOLIAGE_SOURCE);
    assert_eq!(
        struct_size(&foliage, "FoliageUniforms") as usize,
        std::mem::size_of::<FoliageUniforms>()
    );

    let ornament = parse_and_validate(ORNAMENT_SOURCE);
    assert_eq!(
        struct_size(&ornament, "SceneUniforms") as usize,
        std::mem::size_of::<SceneUniforms>()
    );
}

#[test]
fn test_vertex_inputs_match_buffer_layouts() {
    let foliage = parse_and_validate(FOLIAGE_SOURCE);
    let vs = &foliage.entry_points[0].function;
    // vertex_index plus four vec3 attributes
    assert_eq!(vs.arguments.len(), 5);
    assert_eq!(std::mem::size_of::<FoliageParticle>(), 4 * 12);

    let ornament = parse_and_validate(ORNAMENT_SOURCE);
    let vs = &ornament.entry_points[0].function;
    // position, normal, four model columns, colour
    assert_eq!(vs.arguments.len(), 7);
    assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    assert_eq!(std::mem::size_of::<OrnamentInstance>(), 80);
}
