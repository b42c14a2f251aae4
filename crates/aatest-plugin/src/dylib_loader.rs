//! Shared-library loader for the AA runtime C ABI.
//!
//! The runtime (a wasmtime host) exports a flat set of C functions. Symbols are
//! resolved once when the library is opened; every module created through the
//! connector keeps the library alive.

use crate::error::{LoadStage, PluginError, Result};
use crate::instance::{ModuleConnector, PluginHandle};
use crate::ParameterAddress;
use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

type GetModulesFn = unsafe extern "C" fn(*const c_char) -> *const c_char;
type ModuleNewFn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut c_void;
type ModuleDeleteFn = unsafe extern "C" fn(*mut c_void);
type ModuleInitFn = unsafe extern "C" fn(*mut c_void, c_int);
type ModuleCountFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type GuiDescriptionFn = unsafe extern "C" fn(*mut c_void) -> *const c_char;
type SetParamFn = unsafe extern "C" fn(*mut c_void, c_int, c_int, f32);
type NoteFn = unsafe extern "C" fn(*mut c_void, c_int, f32);
type ComputeZeroOneFn = unsafe extern "C" fn(*mut c_void, c_int, *mut f32);
type ComputeZeroTwoFn = unsafe extern "C" fn(*mut c_void, c_int, *mut f32, *mut f32);
type ComputeOneOneFn = unsafe extern "C" fn(*mut c_void, c_int, *const f32, *mut f32);
type ComputeOneTwoFn = unsafe extern "C" fn(*mut c_void, c_int, *const f32, *mut f32, *mut f32);
type ComputeTwoTwoFn =
    unsafe extern "C" fn(*mut c_void, c_int, *const f32, *const f32, *mut f32, *mut f32);

struct AaApi {
    get_modules: GetModulesFn,
    module_new: ModuleNewFn,
    module_delete: ModuleDeleteFn,
    module_init: ModuleInitFn,
    number_inputs: ModuleCountFn,
    number_outputs: ModuleCountFn,
    gui_description: GuiDescriptionFn,
    set_param_float: SetParamFn,
    note_on: NoteFn,
    note_off: NoteFn,
    compute_zero_one: ComputeZeroOneFn,
    compute_zero_two: ComputeZeroTwoFn,
    compute_one_one: ComputeOneOneFn,
    compute_one_two: ComputeOneTwoFn,
    compute_two_two: ComputeTwoTwoFn,
}

struct AaLibrary {
    api: AaApi,
    // Must outlive every function pointer in `api`.
    _library: libloading::Library,
}

/// # Safety
/// `T` must be the exact function pointer type of the exported symbol.
unsafe fn symbol<T: Copy>(library: &libloading::Library, path: &Path, name: &[u8]) -> Result<T> {
    let sym: libloading::Symbol<T> = library.get(name).map_err(|e| PluginError::LoadFailed {
        module: path.display().to_string(),
        stage: LoadStage::Opening,
        reason: format!(
            "No {} symbol: {}",
            String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name)),
            e
        ),
    })?;
    Ok(*sym)
}

impl AaLibrary {
    fn open(path: &Path) -> Result<Self> {
        let library = unsafe {
            libloading::Library::new(path).map_err(|e| PluginError::LoadFailed {
                module: path.display().to_string(),
                stage: LoadStage::Opening,
                reason: format!("Failed to load library: {}", e),
            })?
        };

        let api = unsafe {
            AaApi {
                get_modules: symbol(&library, path, b"aa_get_modules\0")?,
                module_new: symbol(&library, path, b"aa_module_new\0")?,
                module_delete: symbol(&library, path, b"aa_module_delete\0")?,
                module_init: symbol(&library, path, b"aa_module_init\0")?,
                number_inputs: symbol(&library, path, b"aa_module_get_number_inputs\0")?,
                number_outputs: symbol(&library, path, b"aa_module_get_number_outputs\0")?,
                gui_description: symbol(&library, path, b"get_gui_description\0")?,
                set_param_float: symbol(&library, path, b"set_param_float\0")?,
                note_on: symbol(&library, path, b"aa_module_handle_note_on\0")?,
                note_off: symbol(&library, path, b"aa_module_handle_note_off\0")?,
                compute_zero_one: symbol(&library, path, b"aa_module_compute_zero_one\0")?,
                compute_zero_two: symbol(&library, path, b"aa_module_compute_zero_two_non\0")?,
                compute_one_one: symbol(&library, path, b"aa_module_compute_one_one\0")?,
                compute_one_two: symbol(&library, path, b"aa_module_compute_one_two_non\0")?,
                compute_two_two: symbol(&library, path, b"aa_module_compute_two_two_non\0")?,
            }
        };

        Ok(Self {
            api,
            _library: library,
        })
    }
}

/// Creates modules through a dynamically loaded AA runtime.
pub struct DylibConnector {
    library: Arc<AaLibrary>,
}

impl DylibConnector {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let library = AaLibrary::open(path)?;
        tracing::info!("Opened AA runtime: {}", path.display());
        Ok(Self {
            library: Arc::new(library),
        })
    }
}

fn c_string(value: &str) -> Option<CString> {
    match CString::new(value) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!("String passed to AA runtime contains NUL: {}", e);
            None
        }
    }
}

/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn owned_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

impl ModuleConnector for DylibConnector {
    fn list_modules(&mut self, server_url: &str) -> Option<String> {
        let url = c_string(server_url)?;
        unsafe { owned_string((self.library.api.get_modules)(url.as_ptr())) }
    }

    fn create(&mut self, server_url: &str, module_url: &str) -> Option<Box<dyn PluginHandle>> {
        let server = c_string(server_url)?;
        let module = c_string(module_url)?;
        let raw = unsafe { (self.library.api.module_new)(server.as_ptr(), module.as_ptr()) };
        let module = NonNull::new(raw)?;
        Some(Box::new(DylibPlugin {
            library: Arc::clone(&self.library),
            module,
        }))
    }
}

/// Module instance owned through the C ABI.
pub struct DylibPlugin {
    library: Arc<AaLibrary>,
    module: NonNull<c_void>,
}

// Safety: the runtime instance is only ever touched through `&mut self`, and
// the host moves it between threads without sharing it.
unsafe impl Send for DylibPlugin {}

impl DylibPlugin {
    #[inline]
    fn api(&self) -> &AaApi {
        &self.library.api
    }

    #[inline]
    fn raw(&self) -> *mut c_void {
        self.module.as_ptr()
    }
}

#[inline]
fn frame_count(frames: usize, shortest: usize) -> c_int {
    frames.min(shortest).min(c_int::MAX as usize) as c_int
}

impl PluginHandle for DylibPlugin {
    fn init(&mut self, sample_rate: f64) {
        unsafe { (self.api().module_init)(self.raw(), sample_rate.round() as c_int) }
    }

    fn input_count(&self) -> usize {
        unsafe { (self.api().number_inputs)(self.raw()) }.max(0) as usize
    }

    fn output_count(&self) -> usize {
        unsafe { (self.api().number_outputs)(self.raw()) }.max(0) as usize
    }

    fn gui_descriptor(&mut self) -> Option<String> {
        unsafe { owned_string((self.api().gui_description)(self.raw())) }
    }

    fn set_param(&mut self, address: ParameterAddress, value: f32) {
        unsafe { (self.api().set_param_float)(self.raw(), address.node, address.index, value) }
    }

    fn note_on(&mut self, pitch: u8, velocity: f32) {
        unsafe { (self.api().note_on)(self.raw(), c_int::from(pitch), velocity) }
    }

    fn note_off(&mut self, pitch: u8, value: f32) {
        unsafe { (self.api().note_off)(self.raw(), c_int::from(pitch), value) }
    }

    fn compute_zero_one(&mut self, frames: usize, output: &mut [f32]) {
        let n = frame_count(frames, output.len());
        unsafe { (self.api().compute_zero_one)(self.raw(), n, output.as_mut_ptr()) }
    }

    fn compute_zero_two(&mut self, frames: usize, left: &mut [f32], right: &mut [f32]) {
        let n = frame_count(frames, left.len().min(right.len()));
        unsafe {
            (self.api().compute_zero_two)(self.raw(), n, left.as_mut_ptr(), right.as_mut_ptr())
        }
    }

    fn compute_one_one(&mut self, frames: usize, input: &[f32], output: &mut [f32]) {
        let n = frame_count(frames, input.len().min(output.len()));
        unsafe {
            (self.api().compute_one_one)(self.raw(), n, input.as_ptr(), output.as_mut_ptr())
        }
    }

    fn compute_one_two(
        &mut self,
        frames: usize,
        input: &[f32],
        left: &mut [f32],
        right: &mut [f32],
    ) {
        let n = frame_count(frames, input.len().min(left.len()).min(right.len()));
        unsafe {
            (self.api().compute_one_two)(
                self.raw(),
                n,
                input.as_ptr(),
                left.as_mut_ptr(),
                right.as_mut_ptr(),
            )
        }
    }

    fn compute_two_two(
        &mut self,
        frames: usize,
        input_left: &[f32],
        input_right: &[f32],
        left: &mut [f32],
        right: &mut [f32],
    ) {
        let shortest = input_left
            .len()
            .min(input_right.len())
            .min(left.len())
            .min(right.len());
        let n = frame_count(frames, shortest);
        unsafe {
            (self.api().compute_two_two)(
                self.raw(),
                n,
                input_left.as_ptr(),
                input_right.as_ptr(),
                left.as_mut_ptr(),
                right.as_mut_ptr(),
            )
        }
    }
}

impl Drop for DylibPlugin {
    fn drop(&mut self) {
        unsafe { (self.api().module_delete)(self.raw()) }
    }
}
