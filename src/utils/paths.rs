use anyhow::{Result, anyhow};
use std::fs;
use std::path::PathBuf;

pub fn get_todo_store_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".todo-store"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_todo_store_dir()?;
    Ok(app_dir.join("config.toml"))
}

/// Default home of the key-value files (`todos.json`).
pub fn get_data_dir() -> Result<PathBuf> {
    let app_dir = get_todo_store_dir()?;
    Ok(app_dir.join("data"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let app_dir = get_todo_store_dir()?;
    Ok(app_dir.join("logs"))
}

pub fn get_crash_log_path() -> Result<PathBuf> {
    let app_dir = get_todo_store_dir()?;
    Ok(app_dir.join("crash.log"))
}

pub fn ensure_directories_exist() -> Result<()> {
    for dir in [get_data_dir()?, get_logs_dir()?] {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_get_todo_store_dir() {
        let dir = get_todo_store_dir().unwrap();
        assert!(dir.to_string_lossy().ends_with(".todo-store"));
    }

    #[test]
    fn test_get_config_path() {
        let path = get_config_path().unwrap();
        assert!(path.to_string_lossy().contains(".todo-store"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir().unwrap();
        assert!(dir.to_string_lossy().contains(".todo-store"));
        assert!(dir.to_string_lossy().ends_with("data"));
    }

    #[test]
    fn test_get_logs_dir() {
        let dir = get_logs_dir().unwrap();
        assert!(dir.to_string_lossy().contains(".todo-store"));
        assert!(dir.to_string_lossy().ends_with("logs"));
    }

    #[test]
    fn test_get_crash_log_path() {
        let path = get_crash_log_path().unwrap();
        assert!(path.to_string_lossy().contains(".todo-store"));
        assert!(path.to_string_lossy().ends_with("crash.log"));
    }

    #[test]
    #[serial]
    fn test_dirs_follow_home() {
        let temp = TempDir::new().unwrap();
        let previous = std::env::var_os("HOME");
        // SAFETY: serialized with every other test that touches HOME
        unsafe { std::env::set_var("HOME", temp.path()) };

        let dir = get_todo_store_dir();
        let ensured = ensure_directories_exist();

        match previous {
            Some(home) => unsafe { std::env::set_var("HOME", home) },
            None => unsafe { std::env::remove_var("HOME") },
        }

        assert_eq!(dir.unwrap(), temp.path().join(".todo-store"));
        ensured.unwrap();
        assert!(temp.path().join(".todo-store").join("data").is_dir());
        assert!(temp.path().join(".todo-store").join("logs").is_dir());
    }
}
