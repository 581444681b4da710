//! Entry point for MeshView.
//! Logging + CLI flags, then hand off to the platform loop.

use anyhow::Result;

/// Model fetched when no `--url=` flag is given.
const DEFAULT_MODEL_URL: &str = "https://aipaint-1251760642.cos.ap-guangzhou.myqcloud.com/test.obj";

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    eprintln!("[warn] Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_url_arg() -> String {
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--url=") {
            if !val.is_empty() {
                return val.to_owned();
            }
        }
    }
    DEFAULT_MODEL_URL.to_owned()
}

fn parse_size_args() -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(1280).max(1);
    let hh = h.unwrap_or(720).max(1);
    (ww, hh)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backends = parse_backend_arg();
    let (width, height) = parse_size_args();
    let model_url = parse_url_arg();
    log::info!(
        "Starting MeshView. Backend: {:?}, window_size={}x{}, model={}",
        backends,
        width,
        height,
        model_url
    );

    let config = platform::ViewerConfig {
        model_url,
        width,
        height,
        backends,
    };

    if let Err(err) = platform::run(config) {
        // A renderer bring-up failure is permanent: report it as the
        // "3D unsupported" condition instead of a generic crash.
        if let Some(renderer_err) = err.downcast_ref::<platform::RendererError>() {
            log::error!("3D rendering unavailable: {renderer_err}");
        }
        return Err(err);
    }

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
