use std::ffi::c_void;

use log::{debug, error, trace};
use windows::{
    core::{s, PCSTR},
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM},
        System::LibraryLoader::GetModuleHandleA,
        UI::WindowsAndMessaging::{
            AdjustWindowRect, CreateWindowExA, DefWindowProcA, DestroyWindow, DispatchMessageA,
            GetClientRect, GetWindowLongPtrA, LoadCursorA, PeekMessageA, PostQuitMessage,
            RegisterClassExA, SetWindowLongPtrA, ShowWindow, TranslateMessage, CREATESTRUCTA,
            CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, IDC_ARROW, MSG, PM_REMOVE,
            SIZE_MINIMIZED, SW_HIDE, SW_SHOW, WM_CREATE, WM_DESTROY, WM_ENTERSIZEMOVE,
            WM_EXITSIZEMOVE, WM_KEYDOWN, WM_QUIT, WM_SIZE, WNDCLASSEXA, WS_OVERLAPPEDWINDOW,
        },
    },
};

use crate::util::AsCString;

type Error = Box<dyn std::error::Error>;

/// Where the window is in its sizing lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeMode {
    #[default]
    Normal,
    /// The user is dragging the frame. Sizes are collected but not reported.
    SizeMove,
    Minimized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    /// Client area settled at a new size.
    Resized { width: u32, height: u32 },
    KeyDown(u8),
}

/// Per-window state reachable from the window procedure.
#[derive(Debug, Default)]
struct WindowState {
    size_mode: SizeMode,
    pending_size: Option<(u32, u32)>,
    events: Vec<WindowEvent>,
}

impl WindowState {
    fn on_size(&mut self, kind: u32, width: u32, height: u32) {
        if kind == SIZE_MINIMIZED {
            self.size_mode = SizeMode::Minimized;
            return;
        }

        match self.size_mode {
            SizeMode::SizeMove => self.pending_size = Some((width, height)),
            SizeMode::Normal | SizeMode::Minimized => {
                self.size_mode = SizeMode::Normal;
                self.events.push(WindowEvent::Resized { width, height });
            }
        }
    }

    fn on_enter_size_move(&mut self) {
        self.size_mode = SizeMode::SizeMove;
    }

    fn on_exit_size_move(&mut self) {
        self.size_mode = SizeMode::Normal;
        if let Some((width, height)) = self.pending_size.take() {
            self.events.push(WindowEvent::Resized { width, height });
        }
    }
}

pub struct Window {
    hwnd: HWND,
    // Boxed so the address handed to the window procedure stays put.
    state: Box<WindowState>,
}

impl Window {
    fn new(title: impl Into<String>, window_size: (i32, i32)) -> Result<Self, Error> {
        let instance = unsafe { GetModuleHandleA(None) }?;

        let class_name = s!("LearnD3D12Class");

        let wc = WNDCLASSEXA {
            cbSize: std::mem::size_of::<WNDCLASSEXA>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wndproc),
            hInstance: instance.into(),
            hCursor: unsafe { LoadCursorA(None, PCSTR(IDC_ARROW.0 as _)) }?,
            lpszClassName: class_name,
            ..Default::default()
        };

        if unsafe { RegisterClassExA(&wc) } == 0 {
            return Err("LearnD3D12Class is already registered".into());
        }

        let mut window_rect = RECT {
            left: 0,
            top: 0,
            right: window_size.0,
            bottom: window_size.1,
        };
        unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false) }?;

        let title = title.into().as_c_string();
        let mut state = Box::<WindowState>::default();
        let state_ptr: *mut WindowState = &mut *state;

        let hwnd = unsafe {
            CreateWindowExA(
                Default::default(),
                class_name,
                PCSTR(title.as_ptr() as _),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                window_rect.right - window_rect.left,
                window_rect.bottom - window_rect.top,
                None, // No parent window.
                None, // No menus.
                instance,
                Some(state_ptr as *const c_void),
            )
        }?;

        if hwnd == HWND::default() {
            return Err("failed to create a window handle".into());
        }

        Ok(Self { hwnd, state })
    }

    pub fn get_handle(&self) -> HWND {
        self.hwnd
    }

    pub fn size_mode(&self) -> SizeMode {
        self.state.size_mode
    }

    pub fn is_minimized(&self) -> bool {
        self.state.size_mode == SizeMode::Minimized
    }

    /// Events collected by the window procedure since the last call.
    pub fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn get_physical_size(&self) -> (i32, i32) {
        let mut window_rect = RECT::default();
        if let Err(e) = unsafe { GetClientRect(self.hwnd, &mut window_rect) } {
            error!("failed to get client rect {e}");
        }

        (
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
        )
    }

    pub fn set_visible(&self, visible: bool) {
        let show = if visible { SW_SHOW } else { SW_HIDE };
        let _ = unsafe { ShowWindow(self.hwnd, show) };
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        unsafe {
            // Detach the state first: it is freed right after this.
            SetWindowLongPtrA(self.hwnd, GWLP_USERDATA, 0);
            if let Err(e) = DestroyWindow(self.hwnd) {
                debug!("window already destroyed: {e}");
            }
        }
    }
}

pub struct App {}

impl App {
    pub fn init(title: impl Into<String>, window_size: (i32, i32)) -> Result<(App, Window), Error> {
        let app = App {};

        let window = Window::new(title, window_size)?;
        window.set_visible(true);

        Ok((app, window))
    }

    /// Drains the message queue. Returns `false` once the application should quit.
    pub fn run(&mut self) -> bool {
        let mut message = MSG::default();
        while unsafe { PeekMessageA(&mut message, None, 0, 0, PM_REMOVE).as_bool() } {
            unsafe {
                let _ = TranslateMessage(&message);
                DispatchMessageA(&message);
            }

            if message.message == WM_QUIT {
                return false;
            }
        }

        true
    }
}

fn window_wndproc(state: &mut WindowState, message: u32, wparam: WPARAM, lparam: LPARAM) -> bool {
    match message {
        WM_SIZE => {
            let width = (lparam.0 & 0xFFFF) as u32;
            let height = ((lparam.0 >> 16) & 0xFFFF) as u32;
            trace!("WM_SIZE {width}x{height}");
            state.on_size(wparam.0 as u32, width, height);
            true
        }

        WM_ENTERSIZEMOVE => {
            state.on_enter_size_move();
            true
        }

        WM_EXITSIZEMOVE => {
            state.on_exit_size_move();
            true
        }

        WM_KEYDOWN => {
            let key = wparam.0 as u8;
            debug!("key down: {key}");
            state.events.push(WindowEvent::KeyDown(key));
            true
        }

        _ => false,
    }
}

extern "system" fn wndproc(hwnd: HWND, message: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match message {
        WM_CREATE => {
            let create_struct: &CREATESTRUCTA = unsafe { &*(lparam.0 as *const CREATESTRUCTA) };
            unsafe { SetWindowLongPtrA(hwnd, GWLP_USERDATA, create_struct.lpCreateParams as _) };
            LRESULT::default()
        }

        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT::default()
        }

        _ => {
            let user_data = unsafe { GetWindowLongPtrA(hwnd, GWLP_USERDATA) };
            let state = std::ptr::NonNull::<WindowState>::new(user_data as _);
            let handled = state.is_some_and(|mut s| {
                window_wndproc(unsafe { s.as_mut() }, message, wparam, lparam)
            });

            if handled {
                LRESULT::default()
            } else {
                unsafe { DefWindowProcA(hwnd, message, wparam, lparam) }
            }
        }
    }
}
