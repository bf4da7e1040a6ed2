// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Location of the native logger library.
//!
//! The install directory is read once from the system configuration (the Windows registry)
//! unless it is overridden through the environment or explicitly.

use crate::error::Error;
use log::debug;
use std::path::PathBuf;

/// Registry key below `HKEY_LOCAL_MACHINE` holding the logger installation
pub const REGISTRY_KEY: &str = "Software\\ArchestrA\\Framework\\Logger";
/// Registry value holding the install directory
pub const INSTALL_PATH_VALUE: &str = "InstallPath";
/// File name of the native logger library inside the install directory
pub const LIBRARY_NAME: &str = "LoggerDll.dll";

/// Environment variable overriding the install directory
pub const ENV_INSTALL_PATH: &str = "WWLOG_INSTALL_PATH";
/// Environment variable overriding the library file name
pub const ENV_LIBRARY_NAME: &str = "WWLOG_LIBRARY_NAME";

/// Where to find the native logger library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Registry key below `HKEY_LOCAL_MACHINE`
    pub registry_key: String,
    /// Registry value name of the install directory
    pub install_path_value: String,
    /// Library file name joined to the install directory
    pub library_name: String,
    /// Install directory. Skips the registry lookup if set.
    pub install_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_key: REGISTRY_KEY.to_string(),
            install_path_value: INSTALL_PATH_VALUE.to_string(),
            library_name: LIBRARY_NAME.to_string(),
            install_path: None,
        }
    }
}

impl Config {
    /// Default configuration with overrides from `WWLOG_INSTALL_PATH` and `WWLOG_LIBRARY_NAME`
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Default configuration with overrides looked up through `var`. Empty values are ignored.
    pub fn from_vars<F: Fn(&str) -> Option<String>>(var: F) -> Self {
        let lookup = |name: &str| var(name).filter(|v| !v.is_empty());
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_INSTALL_PATH) {
            config.install_path = Some(PathBuf::from(path));
        }
        if let Some(name) = lookup(ENV_LIBRARY_NAME) {
            config.library_name = name;
        }
        config
    }

    /// Set an explicit install directory
    pub fn with_install_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.install_path = Some(path.into());
        self
    }

    /// Resolve the install directory. An empty value counts as not found.
    pub fn resolve_install_path(&self) -> Result<PathBuf, Error> {
        if let Some(path) = &self.install_path {
            if path.as_os_str().is_empty() {
                return Err(Error::NotFound("install path is empty"));
            }
            return Ok(path.clone());
        }

        match registry::read_string(&self.registry_key, &self.install_path_value)? {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Err(Error::NotFound("install path not configured")),
        }
    }

    /// Resolve the full path of the native library
    pub fn resolve_library_path(&self) -> Result<PathBuf, Error> {
        let path = self.resolve_install_path()?.join(&self.library_name);
        debug!("Logger library path is {path:?}");
        Ok(path)
    }
}

#[cfg(windows)]
mod registry {
    use crate::error::Error;
    use crate::native::wide;
    use std::{io, ptr};
    use windows_sys::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_SUCCESS};
    use windows_sys::Win32::System::Registry::{
        RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_EXPAND_SZ, RRF_RT_REG_SZ,
    };

    /// Accepted value types. Environment references in expandable strings are expanded.
    const STRING_TYPES: u32 = RRF_RT_REG_SZ | RRF_RT_REG_EXPAND_SZ;

    /// Read a string value below `HKEY_LOCAL_MACHINE`. A missing key or value yields `None`.
    pub fn read_string(key: &str, value: &str) -> Result<Option<String>, Error> {
        let key = wide(key);
        let value = wide(value);

        // Query the size in bytes first
        let mut size: u32 = 0;
        // Safety: key and value are NUL-terminated, size is a valid out pointer
        let ret = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                key.as_ptr(),
                value.as_ptr(),
                STRING_TYPES,
                ptr::null_mut(),
                ptr::null_mut(),
                &mut size,
            )
        };
        if ret == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        if ret != ERROR_SUCCESS {
            return Err(Error::Config((
                io::Error::from_raw_os_error(ret as i32),
                "failed to query install path",
            )));
        }

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        // Safety: buffer holds `size` bytes
        let ret = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                key.as_ptr(),
                value.as_ptr(),
                STRING_TYPES,
                ptr::null_mut(),
                buffer.as_mut_ptr().cast(),
                &mut size,
            )
        };
        if ret != ERROR_SUCCESS {
            return Err(Error::Config((
                io::Error::from_raw_os_error(ret as i32),
                "failed to read install path",
            )));
        }

        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        Ok(Some(String::from_utf16_lossy(&buffer[..len])))
    }

}

#[cfg(not(windows))]
mod registry {
    use crate::error::Error;

    /// There is no registry on this platform
    pub fn read_string(_key: &str, _value: &str) -> Result<Option<String>, Error> {
        Ok(None)
    }
}
