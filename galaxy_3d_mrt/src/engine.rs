/// Galaxy3D Engine - Singleton manager for engine subsystems
///
/// This module provides global singleton management for graphics devices,
/// the target manager, and the logger. It uses thread-safe static storage
/// with RwLock for safe concurrent access.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::graphics_device::GraphicsDevice;
use crate::target::TargetManager;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Named graphics devices (each wrapped in Mutex for mutable access)
    graphics_devices: RwLock<FxHashMap<String, Arc<Mutex<dyn GraphicsDevice>>>>,
    /// Target manager singleton
    target_manager: RwLock<Option<Arc<Mutex<TargetManager>>>>,
}

impl EngineState {
    /// Create a new empty engine state
    fn new() -> Self {
        Self {
            graphics_devices: RwLock::new(FxHashMap::default()),
            target_manager: RwLock::new(None),
        }
    }
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// Manages the lifecycle of all engine subsystems (graphics devices, target
/// manager, logger) using a singleton pattern with thread-safe access.
///
/// # Example
///
/// ```ignore
/// use galaxy_3d_mrt::galaxy3d::Engine;
///
/// Engine::initialize()?;
/// let device = Engine::create_graphics_device("main", my_device)?;
/// Engine::create_target_manager()?;
///
/// let targets = Engine::target_manager()?;
/// targets.lock().unwrap()
///     .create_multi_render_target("gbuffer", device, (1280, 720), 3, None, None)?;
///
/// Engine::shutdown();
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("galaxy3d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("galaxy3d::Engine", "Backend error: {}", msg);
            }
            Error::InvalidResource(msg) => {
                crate::engine_error!("galaxy3d::Engine", "Invalid resource: {}", msg);
            }
            _ => {
                crate::engine_error!("galaxy3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    /// Initialize the engine
    ///
    /// This must be called once at application startup before creating any
    /// subsystems. Calling it again is harmless.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shutdown the entire engine and destroy all singletons
    ///
    /// Render targets are disposed BEFORE the graphics devices are dropped,
    /// since their framebuffers were allocated by those devices.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut tm) = state.target_manager.write() {
                if let Some(tm) = tm.take() {
                    if let Ok(mut tm) = tm.lock() {
                        tm.clear();
                    }
                }
            }
            if let Ok(mut devices) = state.graphics_devices.write() {
                devices.clear();
            }
        }
    }

    // ===== GRAPHICS DEVICE API =====

    /// Create and register a named graphics device
    ///
    /// Wraps the device in `Arc<Mutex<_>>` and returns the shared handle,
    /// ready to be handed to render targets.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A device with the same name already exists
    /// - The device registry lock is poisoned
    pub fn create_graphics_device<D: GraphicsDevice + 'static>(
        name: &str,
        device: D,
    ) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let state = Self::state()?;

        let mut devices = state.graphics_devices.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice registry lock poisoned".to_string())
            ))?;

        if devices.contains_key(name) {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed(format!(
                    "GraphicsDevice '{}' already exists. Call Engine::destroy_graphics_device() first.", name
                ))
            ));
        }

        let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(device));
        devices.insert(name.to_string(), Arc::clone(&device));

        crate::engine_info!("galaxy3d::Engine", "GraphicsDevice '{}' created", name);

        Ok(device)
    }

    /// Get a graphics device by name
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or the device
    /// does not exist.
    pub fn graphics_device(name: &str) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let state = Self::state()?;

        let devices = state.graphics_devices.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice registry lock poisoned".to_string())
            ))?;

        devices.get(name).cloned()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InvalidResource(format!(
                    "GraphicsDevice '{}' not found. Call Engine::create_graphics_device() first.", name
                ))
            ))
    }

    /// Destroy a graphics device by name
    ///
    /// Existing handles stay valid until dropped. Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized.
    pub fn destroy_graphics_device(name: &str) -> Result<()> {
        let state = Self::state()?;

        let mut devices = state.graphics_devices.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice registry lock poisoned".to_string())
            ))?;

        if devices.remove(name).is_some() {
            crate::engine_info!("galaxy3d::Engine", "GraphicsDevice '{}' destroyed", name);
        }

        Ok(())
    }

    /// Number of registered graphics devices (0 if not initialized)
    pub fn graphics_device_count() -> usize {
        ENGINE_STATE.get()
            .and_then(|state| state.graphics_devices.read().ok().map(|devices| devices.len()))
            .unwrap_or(0)
    }

    /// Names of the registered graphics devices
    pub fn graphics_device_names() -> Vec<String> {
        ENGINE_STATE.get()
            .and_then(|state| state.graphics_devices.read().ok()
                .map(|devices| devices.keys().cloned().collect()))
            .unwrap_or_default()
    }

    // ===== TARGET MANAGER API =====

    /// Create and register the target manager singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A target manager already exists
    pub fn create_target_manager() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.target_manager.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TargetManager lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("TargetManager already exists. Call Engine::destroy_target_manager() first.".to_string())
            ));
        }

        *lock = Some(Arc::new(Mutex::new(TargetManager::new())));

        crate::engine_info!("galaxy3d::Engine", "TargetManager singleton created successfully");

        Ok(())
    }

    /// Get the target manager singleton
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or the target
    /// manager has not been created.
    pub fn target_manager() -> Result<Arc<Mutex<TargetManager>>> {
        let state = Self::state()?;

        let lock = state.target_manager.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TargetManager lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("TargetManager not created. Call Engine::create_target_manager() first.".to_string())
            ))
    }

    /// Destroy the target manager singleton, disposing every target it holds
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized.
    pub fn destroy_target_manager() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.target_manager.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TargetManager lock poisoned".to_string())
            ))?;

        if let Some(tm) = lock.take() {
            let mut tm = tm.lock()
                .map_err(|_| Self::log_and_return_error(
                    Error::BackendError("TargetManager lock poisoned".to_string())
                ))?;
            tm.clear();
        }

        crate::engine_info!("galaxy3d::Engine", "TargetManager singleton destroyed");

        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger,
    /// test capture, etc.)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_mrt::galaxy3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(new_logger: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(new_logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger::default());
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source module (e.g., "galaxy3d::Engine")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry::new(severity, source, message));
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry::new(severity, source, message).with_location(file, line));
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
