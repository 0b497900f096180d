//! Definition document shape tests

use secrecy::ExposeSecret;

use autodeployd::models::deployment::Deployment;

#[test]
fn parses_the_full_document_shape() {
    let doc = serde_json::json!({
        "key": "deploy-api",
        "name": "API deploy",
        "vps_ip": "203.0.113.10",
        "vps_Credentials": { "username": "root", "password": "hunter2" },
        "scriptLines": [
            { "command": "cd", "args": ["/srv/app"], "passwordRequired": false },
            { "command": "git", "args": ["pull"] },
            { "command": "systemctl", "passwordRequired": true }
        ]
    });

    let deployment: Deployment = serde_json::from_value(doc).unwrap();

    assert_eq!(deployment.key, "deploy-api");
    assert_eq!(deployment.display_name(), "API deploy");
    assert_eq!(deployment.vps_ip, "203.0.113.10");
    assert_eq!(deployment.credentials.username, "root");
    assert_eq!(deployment.credentials.password.expose_secret(), "hunter2");
    assert_eq!(deployment.script_lines.len(), 3);
}

#[test]
fn absent_args_mean_no_arguments() {
    let doc = serde_json::json!({
        "key": "k",
        "vps_ip": "10.0.0.1",
        "vps_Credentials": { "username": "u", "password": "p" },
        "scriptLines": [{ "command": "uptime" }]
    });

    let deployment: Deployment = serde_json::from_value(doc).unwrap();

    assert!(deployment.script_lines[0].args.is_empty());
    assert!(!deployment.script_lines[0].password_required);
}

#[test]
fn unnamed_definitions_fall_back_to_the_key() {
    let doc = serde_json::json!({
        "key": "deploy-web",
        "vps_ip": "10.0.0.1",
        "vps_Credentials": { "username": "u", "password": "p" },
        "scriptLines": []
    });

    let deployment: Deployment = serde_json::from_value(doc).unwrap();

    assert_eq!(deployment.name, None);
    assert_eq!(deployment.display_name(), "deploy-web");
}
