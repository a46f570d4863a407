use vibemix::config::*;

#[test]
fn test_callback_path_follows_redirect_uri() {
    assert_eq!(callback_path("http://127.0.0.1:8888/callback"), "/callback");
    assert_eq!(
        callback_path("http://localhost:3000/auth/spotify"),
        "/auth/spotify"
    );
}

#[test]
fn test_callback_path_defaults() {
    // No path or an unparsable URI mounts the callback on /callback
    assert_eq!(callback_path("http://127.0.0.1:8888"), "/callback");
    assert_eq!(callback_path("http://127.0.0.1:8888/"), "/callback");
    assert_eq!(callback_path("not a url"), "/callback");
}

#[test]
fn test_redirect_server_addr() {
    assert_eq!(
        redirect_server_addr("http://127.0.0.1:8888/callback"),
        "127.0.0.1:8888"
    );
    assert_eq!(
        redirect_server_addr("http://localhost:3000/callback"),
        "127.0.0.1:3000"
    );

    // Without an explicit port the scheme default is used
    assert_eq!(redirect_server_addr("http://localhost/callback"), "127.0.0.1:80");
    assert_eq!(redirect_server_addr("not a url"), DEFAULT_SERVER_ADDRESS);
}

#[test]
fn test_data_dir() {
    assert!(data_dir().ends_with("vibemix"));
}
