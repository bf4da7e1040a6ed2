// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! C interface to the process-wide facade.
//!
//! Strings are NUL-terminated UTF-8. Null pointers, invalid UTF-8 and unknown category codes
//! are ignored; nothing here panics across the boundary.

use crate::{facade, Category, Cookie};
use std::ffi::{c_char, c_int, CStr};

#[allow(non_camel_case_types)]
type wwlog_category = c_int;

/// Borrow a C string. `None` for null pointers and invalid UTF-8.
///
/// # Safety
///
/// `s` must be null or point to a NUL-terminated string valid for the duration of the call.
unsafe fn str_from<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

/// Log `message` under the category with code `category` (1 = error ... 11 = refcount)
#[no_mangle]
unsafe extern "C" fn wwlog_log(category: wwlog_category, message: *const c_char) {
    let (Some(category), Some(message)) = (Category::from_code(category), str_from(message))
    else {
        return;
    };
    facade().log(category, message);
}

/// Replace the identity name
#[no_mangle]
unsafe extern "C" fn wwlog_set_identity_name(name: *const c_char) {
    if let Some(name) = str_from(name) {
        facade().set_identity_name(name);
    }
}

/// Register a custom flag. A negative `default_value` keeps the logger default (off),
/// otherwise non-zero is on. Returns the cookie or 0 on failure.
#[no_mangle]
unsafe extern "C" fn wwlog_register_custom_flag(
    name: *const c_char,
    default_value: c_int,
) -> c_int {
    let Some(name) = str_from(name) else {
        return 0;
    };
    let cookie = if default_value < 0 {
        facade().register_custom_flag(name)
    } else {
        facade().register_custom_flag_ex(name, default_value != 0)
    };
    cookie.map_or(0, Cookie::get)
}

/// Log `message` under the custom flag `cookie`
#[no_mangle]
unsafe extern "C" fn wwlog_log_custom(cookie: c_int, message: *const c_char) {
    let (Some(cookie), Some(message)) = (Cookie::new(cookie), str_from(message)) else {
        return;
    };
    facade().log_custom(cookie, message);
}

/// Number of errors logged, or -1 if unavailable
#[no_mangle]
extern "C" fn wwlog_error_count() -> c_int {
    facade().error_count()
}

/// Number of warnings logged, or -1 if unavailable
#[no_mangle]
extern "C" fn wwlog_warning_count() -> c_int {
    facade().warning_count()
}
