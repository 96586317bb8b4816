//! System-dependent functions, or anything that this library is unable to
//! do without help from the OS.

use std::ffi::OsStr;
use std::path::Path;

extern crate libc;


#[cfg(any(target_os = "macos", target_os = "ios"))]
extern {
    fn gettimeofday(tp: *mut libc::timeval, tzp: *mut libc::timezone) -> libc::c_int;
}

#[cfg(all(unix, not(target_os = "macos"), not(target_os = "ios")))]
use libc::clock_gettime;


/// Returns the system’s current time, as a number of seconds elapsed
/// since the Unix epoch.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) fn sys_time() -> i64 {
    use std::ptr::null_mut;

    let mut tv = libc::timeval { tv_sec: 0, tv_usec: 0 };
    let _ = unsafe { gettimeofday(&mut tv, null_mut()) };
    tv.tv_sec as i64
}

/// Returns the system’s current time, as a number of seconds elapsed
/// since the Unix epoch.
#[cfg(all(unix, not(target_os = "macos"), not(target_os = "ios")))]
pub(crate) fn sys_time() -> i64 {
    let mut tv = libc::timespec { tv_sec: 0, tv_nsec: 0 };
    let _ = unsafe { clock_gettime(libc::CLOCK_REALTIME, &mut tv) };
    tv.tv_sec as i64
}

#[cfg(windows)] use winapi::shared::minwindef::FILETIME;
#[cfg(windows)] const HECTONANOSECS_IN_SEC: i64 = 10_000_000;
#[cfg(windows)] const HECTONANOSEC_TO_UNIX_EPOCH: i64 = 11_644_473_600 * HECTONANOSECS_IN_SEC;

/// Returns the system’s current time, as a number of seconds elapsed
/// since the Unix epoch.
#[cfg(windows)]
pub(crate) fn sys_time() -> i64 {
    use std::mem;
    use winapi::um::sysinfoapi::GetSystemTimeAsFileTime;

    let ft = unsafe {
        let mut ft = mem::zeroed();
        GetSystemTimeAsFileTime(&mut ft);
        ft
    };

    (file_time_as_u64(&ft) as i64 - HECTONANOSEC_TO_UNIX_EPOCH) / HECTONANOSECS_IN_SEC
}

#[cfg(windows)]
fn file_time_as_u64(ft: &FILETIME) -> u64 {
    ((ft.dwHighDateTime as u64) << 32) | (ft.dwLowDateTime as u64)
}


/// Attempts to determine the system’s current time zone. There’s no
/// guaranteed way to do this, so this function returns `None` if no
/// timezone could be found.
pub fn system_time_zone() -> Option<String> {
    use std::fs::read_link;

    let link = match read_link("/etc/localtime") {
        Ok(link) => link,
        Err(_) => return None,
    };

    if let Some(tz) = extract_timezone(&*link) {
        if !tz.is_empty() {
            return Some(tz);
        }
    }

    None
}

/// Given a path, returns whether a valid zoneinfo timezone name can be
/// detected at the end of that path.
fn extract_timezone(path: &Path) -> Option<String> {
    let mut bits = Vec::new();

    for pathlet in path.iter().rev().take_while(|c| is_tz_component(c)) {
        match pathlet.to_str() {
            Some(s) => bits.insert(0, s),
            None => return None,
        }
    }

    Some(bits.join("/"))
}

/// Returns whether the input string could be used as a component of a
/// zoneinfo timezone name, which in this case is whether its first
/// character is a capital letter.
fn is_tz_component(component: &OsStr) -> bool {
    if let Some(component_str) = component.to_str() {
        let first_char = component_str.chars().next().unwrap();
        first_char.is_uppercase()
    }
    else {
        false
    }
}
