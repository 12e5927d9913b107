//! Built-in keywords, types and the prelude library
//!
//! [`BuiltinSet`] is declarative seed data for the
//! [`SymbolTable`](super::symbols::SymbolTable). The prelude is ordinary
//! source text that is parsed ahead of user code, so the built-in state
//! structs go through the same grammar and the same redefinition checks as
//! user structs.

use super::enums::{self, EnumResolver};
use std::sync::Arc;

/// Bumped whenever [`PRELUDE`] changes in a way that moves line numbers or
/// alters built-in struct layouts.
pub const PRELUDE_VERSION: u32 = 1;

pub const PRELUDE: &str = r#"
[internal]
struct SamplerState
{
	AddressingMode AddressU;
	AddressingMode AddressV;
	AddressingMode AddressW;
	FilteringMode MinFilter;
	FilteringMode MagFilter;
	float MipLODBias;
	uint MaxAnisotropy;
	float BorderColor;
	float MinLOD;
	float MaxLOD;
};

[internal]
struct BlendState
{
	uint Enable;
	BlendType SrcBlend;
	BlendType DestBlend;
	BlendFunc BlendOp;
	BlendType SrcBlendAlpha;
	BlendType DestBlendAlpha;
	BlendFunc BlendOpAlpha;
	uint WriteMask;
};

[internal]
struct StencilFaceState
{
	StencilFunc Fail;
	StencilFunc DepthFail;
	StencilFunc Pass;
	CompareMode Func;
};

[internal]
struct RenderState
{
	BlendState BlendStates;

	StencilFaceState StencilFront;
	StencilFaceState StencilBack;
	uint DepthEnable;
	uint DepthWriteMask;
	CompareMode DepthFunc;
	uint StencilEnable;
	uint StencilRef;
	uint StencilRead;
	uint StencilWrite;

	FillMode FillMode;
	CullMode CullMode;
	float DepthBias;
	float SlopeScaledDepthBias;
	uint AntialiasedLineEnable;
};

[internal]
struct Technique
{
	void VertexShader;
	void GeometryShader;
	void HullShader;
	void DomainShader;
	void PixelShader;
	void ComputeShader;

	RenderState RenderState;
};
"#;

/// Attribute marking structs that come from the prelude.
pub const INTERNAL_ATTRIBUTE: &str = "internal";

/// Name of the prelude struct that composes shader stages.
pub const TECHNIQUE_STRUCT: &str = "Technique";

/// Members of [`TECHNIQUE_STRUCT`] that bind shader stage functions.
pub const TECHNIQUE_STAGES: [&str; 6] = [
    "VertexShader",
    "GeometryShader",
    "HullShader",
    "DomainShader",
    "PixelShader",
    "ComputeShader",
];

/// Number of lines the prelude (plus its separator) adds ahead of user text.
pub fn prelude_line_count() -> usize {
    PRELUDE.matches('\n').count() + 1
}

/// Joins the prelude and user text the way the parser sees them.
pub fn patch_source(source: &str, include_prelude: bool) -> String {
    if include_prelude {
        format!("{}\n{}", PRELUDE, source)
    } else {
        source.to_string()
    }
}

/// Seed data for a symbol table
#[derive(Debug, Clone)]
pub struct BuiltinSet {
    pub storage_classes: Vec<&'static str>,
    pub modifiers: Vec<&'static str>,
    /// Scalar, vector and matrix types with their byte sizes.
    pub base_types: Vec<(&'static str, u32)>,
    pub read_only_resources: Vec<&'static str>,
    pub read_write_resources: Vec<&'static str>,
    pub enums: Vec<(&'static str, Arc<dyn EnumResolver>)>,
}

fn table(resolver: enums::TableEnum) -> Arc<dyn EnumResolver> {
    Arc::new(resolver)
}

impl Default for BuiltinSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl BuiltinSet {
    /// An empty set: no keywords and no types.
    pub fn empty() -> Self {
        BuiltinSet {
            storage_classes: Vec::new(),
            modifiers: Vec::new(),
            base_types: Vec::new(),
            read_only_resources: Vec::new(),
            read_write_resources: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// The host's built-in keywords, types and enumerations.
    pub fn standard() -> Self {
        BuiltinSet {
            storage_classes: vec![
                "extern",
                "nointerpolation",
                "precise",
                "shared",
                "groupshared",
                "static",
                "uniform",
                "volatile",
            ],
            modifiers: vec!["const", "row_major", "column_major"],
            base_types: vec![
                ("void", 0),
                ("float", 4),
                ("float2", 8),
                ("float3", 12),
                ("float4", 16),
                ("float3x3", 36),
                ("float4x4", 64),
                ("int", 4),
                ("int2", 8),
                ("int3", 12),
                ("int4", 16),
                ("uint", 4),
                ("uint2", 8),
                ("uint3", 12),
                ("uint4", 16),
            ],
            read_only_resources: vec![
                "Buffer",
                "ByteAddressBuffer",
                "StructuredBuffer",
                "Texture1D",
                "Texture1DArray",
                "Texture2D",
                "Texture2DArray",
                "Texture3D",
                "Texture2DMS",
                "Texture2DMSArray",
                "TextureCube",
                "TextureCubeArray",
            ],
            read_write_resources: vec![
                "RWBuffer",
                "RWByteAddressBuffer",
                "RWStructuredBuffer",
                "RWTexture1D",
                "RWTexture1DArray",
                "RWTexture2D",
                "RWTexture2DArray",
                "RWTexture3D",
            ],
            enums: vec![
                ("AddressingMode", table(enums::ADDRESSING_MODE)),
                ("FilteringMode", table(enums::FILTERING_MODE)),
                ("FillMode", table(enums::FILL_MODE)),
                ("CullMode", table(enums::CULL_MODE)),
                ("BlendType", table(enums::BLEND_TYPE)),
                ("BlendFunc", table(enums::BLEND_FUNC)),
                ("CompareMode", table(enums::COMPARE_MODE)),
                ("StencilFunc", table(enums::STENCIL_FUNC)),
            ],
        }
    }
}
