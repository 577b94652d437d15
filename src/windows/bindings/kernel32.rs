//! Kernel32.dll bindings for process, thread and memory queries

use crate::core::types::PlatformCode;
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE, LPVOID};
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::memoryapi::{ReadProcessMemory, VirtualQueryEx};
use winapi::um::processthreadsapi::{GetThreadContext, OpenProcess, OpenThread};
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Thread32First, Thread32Next, TH32CS_SNAPTHREAD, THREADENTRY32,
};
use winapi::um::winnt::{CONTEXT, HANDLE, MEMORY_BASIC_INFORMATION};

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: DWORD) -> Result<HANDLE, PlatformCode> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if handle.is_null() {
        Err(PlatformCode::last())
    } else {
        Ok(handle)
    }
}

/// Safe wrapper for OpenThread
pub fn open_thread(tid: u32, desired_access: DWORD) -> Result<HANDLE, PlatformCode> {
    let handle = unsafe { OpenThread(desired_access, FALSE, tid) };
    if handle.is_null() {
        Err(PlatformCode::last())
    } else {
        Ok(handle)
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle that is not closed elsewhere
pub unsafe fn close_handle(handle: HANDLE) -> Result<(), PlatformCode> {
    if handle.is_null() || handle == INVALID_HANDLE_VALUE {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(PlatformCode::last())
    } else {
        Ok(())
    }
}

/// Safe wrapper for ReadProcessMemory
///
/// A failed call can still have copied a prefix of the range; that prefix is
/// reported as a successful short read.
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_READ`
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: usize,
    buffer: &mut [u8],
) -> Result<usize, PlatformCode> {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address as LPVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE && bytes_read == 0 {
        Err(PlatformCode::last())
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for VirtualQueryEx
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_QUERY_INFORMATION`
pub unsafe fn virtual_query_ex(
    handle: HANDLE,
    address: usize,
) -> Result<MEMORY_BASIC_INFORMATION, PlatformCode> {
    let mut mbi: MEMORY_BASIC_INFORMATION = mem::zeroed();

    let result = VirtualQueryEx(
        handle,
        address as LPVOID,
        &mut mbi,
        mem::size_of::<MEMORY_BASIC_INFORMATION>(),
    );

    if result == 0 {
        Err(PlatformCode::last())
    } else {
        Ok(mbi)
    }
}

/// Safe wrapper for GetThreadContext
///
/// `flags` selects the register groups to capture.
///
/// # Safety
/// The handle must be a valid thread handle with `THREAD_GET_CONTEXT`
pub unsafe fn get_thread_context(handle: HANDLE, flags: DWORD) -> Result<CONTEXT, PlatformCode> {
    let mut context: CONTEXT = mem::zeroed();
    context.ContextFlags = flags;

    if GetThreadContext(handle, &mut context) == FALSE {
        Err(PlatformCode::last())
    } else {
        Ok(context)
    }
}

/// Snapshot of all threads in the system as `(thread id, owner pid)` pairs
pub fn snapshot_threads() -> Result<Vec<(u32, u32)>, PlatformCode> {
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPTHREAD, 0) };
    if snapshot == INVALID_HANDLE_VALUE {
        return Err(PlatformCode::last());
    }
    let snapshot = crate::windows::types::Handle::new(snapshot);

    let mut threads = Vec::new();
    let mut entry: THREADENTRY32 = unsafe { mem::zeroed() };
    entry.dwSize = mem::size_of::<THREADENTRY32>() as DWORD;

    let mut more = unsafe { Thread32First(snapshot.raw(), &mut entry) } != FALSE;
    while more {
        threads.push((entry.th32ThreadID, entry.th32OwnerProcessID));
        more = unsafe { Thread32Next(snapshot.raw(), &mut entry) } != FALSE;
    }

    Ok(threads)
}
