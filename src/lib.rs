pub mod core;
pub mod models;
pub mod ui;

/// Initialise logging from `RUST_LOG`, defaulting to `info`
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::core::bridge::FrameFeed;
    use crate::core::config::Config;
    use crate::core::consent::ConsentError;
    use crate::core::session::PracticeSession;
    use crate::models::permission::PermissionState;
    use crate::models::pose::{LandmarkFrame, PoseResult};
    use crate::ui::footer::current_year;
    use crate::ui::navbar::Navbar;
    use crate::ui::pages::landing::landing;
    use crate::ui::pages::Route;
    use std::sync::Mutex;
    use tauri::async_runtime::JoinHandle;
    use tauri::{AppHandle, Emitter, Manager, State};

    /// Event carrying every new classifier verdict to the webview
    const POSE_RESULT_EVENT: &str = "pose-result";

    /// The practice page while it is open
    struct LivePractice {
        session: PracticeSession,
        feed: FrameFeed,
        forwarder: Option<JoinHandle<()>>,
    }

    // Application state
    pub struct AppState {
        config: Mutex<Config>,
        navbar: Mutex<Navbar>,
        route: Mutex<Route>,
        practice: tokio::sync::Mutex<Option<LivePractice>>,
    }

    impl AppState {
        fn new(config: Config) -> Self {
            Self {
                config: Mutex::new(config),
                navbar: Mutex::new(Navbar::new()),
                route: Mutex::new(Route::Landing),
                practice: tokio::sync::Mutex::new(None),
            }
        }

        fn config(&self) -> Result<Config, String> {
            self.config
                .lock()
                .map(|config| config.clone())
                .map_err(|e| format!("Failed to lock config: {}", e))
        }

        fn navbar(&self) -> Result<Navbar, String> {
            self.navbar
                .lock()
                .map(|navbar| *navbar)
                .map_err(|e| format!("Failed to lock navbar: {}", e))
        }

        fn route(&self) -> Result<Route, String> {
            self.route
                .lock()
                .map(|route| *route)
                .map_err(|e| format!("Failed to lock route: {}", e))
        }

        async fn render(&self) -> Result<String, String> {
            let navbar = self.navbar()?;
            match self.route()? {
                Route::Landing => Ok(landing(&navbar, current_year())),
                Route::Practice => {
                    let practice = self.practice.lock().await;
                    let live = practice.as_ref().ok_or("Practice session not running")?;
                    Ok(live.session.render(&navbar))
                }
            }
        }
    }

    async fn enter_practice(app: &AppHandle, config: Config) -> LivePractice {
        let endpoint = match config.resolve_endpoint() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };

        let (session, feed) = PracticeSession::enter_host_fed(config, endpoint).await;

        let forwarder = session.subscribe_pose().map(|mut verdicts| {
            let app = app.clone();
            tauri::async_runtime::spawn(async move {
                while verdicts.changed().await.is_ok() {
                    let pose = verdicts.borrow_and_update().clone();
                    if let Err(e) = app.emit(POSE_RESULT_EVENT, pose) {
                        log::warn!("Failed to emit pose result: {}", e);
                    }
                }
            })
        });

        LivePractice {
            session,
            feed,
            forwarder,
        }
    }

    async fn leave_practice(live: LivePractice) {
        if let Some(forwarder) = live.forwarder {
            forwarder.abort();
        }
        live.session.leave().await;
    }

    // Navigation commands
    #[tauri::command]
    async fn navigate(path: String, app: AppHandle, state: State<'_, AppState>) -> Result<String, String> {
        let target = Route::from_path(&path).ok_or_else(|| format!("Unknown page: {}", path))?;

        {
            let mut practice = state.practice.lock().await;
            match target {
                Route::Practice if practice.is_none() => {
                    let config = state.config()?;
                    *practice = Some(enter_practice(&app, config).await);
                }
                Route::Landing => {
                    if let Some(live) = practice.take() {
                        leave_practice(live).await;
                    }
                }
                Route::Practice => {}
            }
        }

        state
            .navbar
            .lock()
            .map_err(|e| format!("Failed to lock navbar: {}", e))?
            .close();
        *state
            .route
            .lock()
            .map_err(|e| format!("Failed to lock route: {}", e))? = target;

        state.render().await
    }

    #[tauri::command]
    async fn render_current(state: State<'_, AppState>) -> Result<String, String> {
        state.render().await
    }

    #[tauri::command]
    async fn toggle_menu(state: State<'_, AppState>) -> Result<String, String> {
        state
            .navbar
            .lock()
            .map_err(|e| format!("Failed to lock navbar: {}", e))?
            .toggle();
        state.render().await
    }

    // Landmark and classifier commands
    #[tauri::command]
    async fn submit_landmarks(frame: LandmarkFrame, state: State<'_, AppState>) -> Result<bool, String> {
        let practice = state.practice.lock().await;
        Ok(practice.as_ref().map(|live| live.feed.push(frame)).unwrap_or(false))
    }

    #[tauri::command]
    async fn get_pose_result(state: State<'_, AppState>) -> Result<PoseResult, String> {
        let practice = state.practice.lock().await;
        Ok(practice
            .as_ref()
            .map(|live| live.session.pose())
            .unwrap_or_default())
    }

    #[tauri::command]
    async fn get_overlay_frame(state: State<'_, AppState>) -> Result<Option<Vec<u8>>, String> {
        let practice = state.practice.lock().await;
        Ok(practice.as_ref().and_then(|live| live.session.overlay_png()))
    }

    // Camera permission commands
    #[tauri::command]
    async fn report_camera_permission(
        permission: String,
        state: State<'_, AppState>,
    ) -> Result<String, String> {
        let permission = PermissionState::from_string(&permission)
            .map_err(|e| format!("Invalid permission state: {}", e))?;

        {
            let mut practice = state.practice.lock().await;
            let live = practice.as_mut().ok_or("Practice session not running")?;
            live.session.on_permission_state(permission);
        }

        state.render().await
    }

    /// Outcome of the webview's camera request; `error` is set when it failed
    #[tauri::command]
    async fn request_camera_access(
        error: Option<String>,
        state: State<'_, AppState>,
    ) -> Result<String, String> {
        {
            let mut practice = state.practice.lock().await;
            let live = practice.as_mut().ok_or("Practice session not running")?;
            live.session.begin_camera_request();
            live.session.finish_camera_request(match error {
                None => Ok(()),
                Some(reason) => Err(ConsentError::Denied(reason)),
            });
        }

        state.render().await
    }

    // Configuration management commands
    #[tauri::command]
    fn get_config(state: State<'_, AppState>) -> Result<Config, String> {
        state.config()
    }

    #[tauri::command]
    fn update_config(config: Config, state: State<'_, AppState>) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Invalid configuration: {}", e))?;

        let mut current_config = state
            .config
            .lock()
            .map_err(|e| format!("Failed to lock config: {}", e))?;

        *current_config = config.clone();

        config
            .save()
            .map_err(|e| format!("Failed to save config: {}", e))?;

        Ok(())
    }

    #[tauri::command]
    fn reset_config(state: State<'_, AppState>) -> Result<Config, String> {
        let default_config = Config::reset().map_err(|e| format!("Failed to reset config: {}", e))?;

        let mut current_config = state
            .config
            .lock()
            .map_err(|e| format!("Failed to lock config: {}", e))?;

        *current_config = default_config.clone();

        Ok(default_config)
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        crate::init_logging();

        let result = tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .setup(|app| {
                let config = match Config::load() {
                    Ok(config) => config,
                    Err(e) => {
                        log::warn!("Failed to load configuration, using defaults: {}", e);
                        Config::default()
                    }
                };

                app.manage(AppState::new(config));
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                navigate,
                render_current,
                toggle_menu,
                submit_landmarks,
                get_pose_result,
                get_overlay_frame,
                report_camera_permission,
                request_camera_access,
                get_config,
                update_config,
                reset_config
            ])
            .run(tauri::generate_context!());

        if let Err(e) = result {
            log::error!("Error while running tauri application: {}", e);
            std::process::exit(1);
        }
    }
}
