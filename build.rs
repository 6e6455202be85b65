// build.rs

fn main() {
    // --- Link against X11 and OpenGL ---
    // pkg-config first; if any probe fails, fall back to plain linker flags.

    let libraries = ["x11", "gl"]; // Xlib for the window, libGL for GLX and the GL 1.1 entry points

    let mut pkg_config_success = true;

    for lib in &libraries {
        let result = pkg_config::probe_library(lib);

        if result.is_err() {
            eprintln!(
                "pkg-config failed for library '{}'. Falling back to manual linking.",
                lib
            );
            pkg_config_success = false;
            break;
        }
    }

    if !pkg_config_success {
        // --- Manual Linking Fallback ---
        // Assumes the libraries live in a standard search path.
        println!("cargo:rustc-link-lib=X11");
        println!("cargo:rustc-link-lib=GL");
        println!("cargo:rustc-link-search=/usr/lib");
        eprintln!(
            "Manual linking flags applied. Ensure X11 and OpenGL (libGL) development libraries are installed."
        );
    } else {
        eprintln!("pkg-config successfully found libraries. Linking configured automatically.");
    }
}
