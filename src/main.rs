// ==========================================
// RODDAR 轮胎管理系统 - 命令行入口
// ==========================================
// 用法:
//   roddar [report|rotate|summary] [truck.json]
//
// 未给出车辆文件时使用演示车辆; 结果以 JSON 输出到 stdout
// ==========================================

use std::error::Error;

use roddar::app::{demo_truck, get_default_config_path, AppState};
use roddar::Truck;

const COMMANDS: [&str; 3] = ["report", "rotate", "summary"];

fn load_truck(path: Option<&str>) -> Result<Truck, Box<dyn Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("读取车辆文件失败 {}: {}", path, e))?;
            let truck: Truck = serde_json::from_str(&raw)
                .map_err(|e| format!("车辆文件格式错误 {}: {}", path, e))?;
            tracing::info!("车辆文件已加载: path={}, truck_id={}", path, truck.id);
            Ok(truck)
        }
        None => {
            tracing::info!("未指定车辆文件,使用演示车辆");
            Ok(demo_truck())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = roddar::logging::init() {
        eprintln!("日志系统初始化失败: {}", e);
    }

    tracing::info!("==================================================");
    tracing::info!("{}", roddar::APP_NAME);
    tracing::info!("系统版本: {}", roddar::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, path) = match args.first().map(String::as_str) {
        Some(cmd) if COMMANDS.contains(&cmd) => (cmd, args.get(1).map(String::as_str)),
        Some(path) => ("report", Some(path)),
        None => ("report", None),
    };

    let state = AppState::new(get_default_config_path())?;
    let truck = state.fleet_api.import_truck(load_truck(path)?, "cli")?;

    let output = match command {
        "rotate" => {
            let outcome = state.fleet_api.auto_rotate(&truck.id, "cli")?;
            let report = state.fleet_api.fleet_report(&truck.id)?;
            serde_json::to_string_pretty(&serde_json::json!({
                "moves": outcome.moves,
                "report": report,
            }))?
        }
        "summary" => state.fleet_api.truck_context_summary(&truck.id)?,
        _ => serde_json::to_string_pretty(&state.fleet_api.fleet_report(&truck.id)?)?,
    };

    println!("{}", output);
    Ok(())
}
