use naga::valid::Capabilities;

const FEATURE_CAPABILITIES: &[(wgpu::Features, Capabilities)] = &[
    (wgpu::Features::IMMEDIATES, Capabilities::IMMEDIATES),
    (wgpu::Features::SHADER_F64, Capabilities::FLOAT64),
    (wgpu::Features::SHADER_F16, Capabilities::SHADER_FLOAT16),
    (wgpu::Features::SHADER_INT64, Capabilities::SHADER_INT64),
    (wgpu::Features::SHADER_PRIMITIVE_INDEX, Capabilities::PRIMITIVE_INDEX),
    (wgpu::Features::SHADER_EARLY_DEPTH_TEST, Capabilities::EARLY_DEPTH_TEST),
    (wgpu::Features::SHADER_FLOAT32_ATOMIC, Capabilities::SHADER_FLOAT32_ATOMIC),
    (wgpu::Features::TEXTURE_ATOMIC, Capabilities::TEXTURE_ATOMIC),
    (
        wgpu::Features::TEXTURE_BINDING_ARRAY,
        Capabilities::TEXTURE_AND_SAMPLER_BINDING_ARRAY,
    ),
    (wgpu::Features::BUFFER_BINDING_ARRAY, Capabilities::BUFFER_BINDING_ARRAY),
    (
        wgpu::Features::TEXTURE_FORMAT_16BIT_NORM,
        Capabilities::STORAGE_TEXTURE_16BIT_NORM_FORMATS,
    ),
    (wgpu::Features::MULTIVIEW, Capabilities::MULTIVIEW),
    (wgpu::Features::DUAL_SOURCE_BLENDING, Capabilities::DUAL_SOURCE_BLENDING),
    (wgpu::Features::CLIP_DISTANCES, Capabilities::CLIP_DISTANCE),
];

const DOWNLEVEL_CAPABILITIES: &[(wgpu::DownlevelFlags, Capabilities)] = &[
    (
        wgpu::DownlevelFlags::SHADER_F16_IN_F32,
        Capabilities::SHADER_FLOAT16_IN_FLOAT32,
    ),
    (
        wgpu::DownlevelFlags::CUBE_ARRAY_TEXTURES,
        Capabilities::CUBE_ARRAY_TEXTURES,
    ),
    (
        wgpu::DownlevelFlags::MULTISAMPLED_SHADING,
        Capabilities::MULTISAMPLED_SHADING,
    ),
];

/// Shader capabilities a device with `features` and `downlevel` flags accepts.
///
/// Validating against these rejects shaders the device would refuse when the
/// module is created.
pub fn capabilities_for(
    features: wgpu::Features,
    downlevel: wgpu::DownlevelFlags,
) -> Capabilities {
    let mut caps = Capabilities::empty();

    for (feature, cap) in FEATURE_CAPABILITIES {
        caps.set(*cap, features.contains(*feature));
    }
    for (flag, cap) in DOWNLEVEL_CAPABILITIES {
        caps.set(*cap, downlevel.contains(*flag));
    }

    // Storage binding arrays need the base array feature as well.
    let storage_arrays = features.contains(wgpu::Features::STORAGE_RESOURCE_BINDING_ARRAY);
    caps.set(
        Capabilities::STORAGE_TEXTURE_BINDING_ARRAY,
        storage_arrays && features.contains(wgpu::Features::TEXTURE_BINDING_ARRAY),
    );
    caps.set(
        Capabilities::STORAGE_BUFFER_BINDING_ARRAY,
        storage_arrays && features.contains(wgpu::Features::BUFFER_BINDING_ARRAY),
    );

    caps
}

/// Capabilities of an already-created device.
///
/// `wgpu::Device` does not report downlevel flags, so a WebGPU-compliant
/// backend is assumed for them; use [`capabilities_for`] with the adapter's
/// flags when they are at hand.
pub fn device_capabilities(device: &wgpu::Device) -> Capabilities {
    capabilities_for(device.features(), wgpu::DownlevelFlags::compliant())
}
