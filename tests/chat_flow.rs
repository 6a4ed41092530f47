use std::net::SocketAddr;
use std::time::Duration;

use lobby_chat::{serve, ChatServer};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a server on an ephemeral port
async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind to an ephemeral port");
    let addr = listener.local_addr().unwrap();

    let (cmd_tx, cmd_rx) = mpsc::channel(256);
    tokio::spawn(ChatServer::new(cmd_rx).run());
    tokio::spawn(serve(listener, cmd_tx, 64));

    addr
}

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("failed to connect to server");
        let (reader, writer) = stream.into_split();
        let mut client = Self {
            lines: BufReader::new(reader).lines(),
            writer,
        };
        assert_eq!(
            client.next_line().await.as_deref(),
            Some("please register using /register <username>")
        );
        client
    }

    /// Connect and register, waiting for our own connect announcement
    async fn register(addr: SocketAddr, username: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client.send(&format!("/register {}", username)).await;
        client
            .read_until(&format!("**connect** [{}]", username))
            .await;
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("failed to write to server");
    }

    async fn send_bytes(&mut self, bytes: &[u8]) {
        self.writer
            .write_all(bytes)
            .await
            .expect("failed to write to server");
    }

    async fn next_line(&mut self) -> Option<String> {
        timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for the server")
            .expect("failed to read from server")
    }

    /// Skip lines until one equals `expected`
    async fn read_until(&mut self, expected: &str) {
        loop {
            match self.next_line().await {
                Some(line) if line == expected => return,
                Some(_) => continue,
                None => panic!("connection closed before '{}'", expected),
            }
        }
    }

    /// Send a command and assert it is the very next thing we hear back
    ///
    /// Anything queued for us before the reply shows up first and fails this.
    async fn expect_reply(&mut self, command: &str, expected: &str) {
        self.send(command).await;
        assert_eq!(self.next_line().await.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let addr = start_server().await;
    let _alice = TestClient::register(addr, "alice").await;

    let mut impostor = TestClient::connect(addr).await;
    impostor.expect_reply("/register alice", "username already taken").await;

    // Still anonymous
    impostor
        .expect_reply("/rooms", "please register using /register <username>")
        .await;
}

#[tokio::test]
async fn room_message_stays_in_room() {
    let addr = start_server().await;
    let mut alice = TestClient::register(addr, "alice").await;
    let mut bob = TestClient::register(addr, "bob").await;
    let mut carol = TestClient::register(addr, "carol").await;

    alice.send("/enter gameroom").await;
    alice.read_until("**enter** [alice] gameroom").await;
    bob.send("/enter gameroom").await;
    bob.read_until("**enter** [bob] gameroom").await;

    alice.send("hello").await;
    bob.read_until("[alice] hello").await;
    alice.read_until("[alice] hello").await;

    carol.read_until("**enter** [bob] gameroom").await;
    carol.expect_reply("/rooms", "gameroom(2)").await;
}

#[tokio::test]
async fn ignored_sender_is_filtered() {
    let addr = start_server().await;
    let mut alice = TestClient::register(addr, "alice").await;
    let mut bob = TestClient::register(addr, "bob").await;
    let mut carol = TestClient::register(addr, "carol").await;

    for (client, name) in [(&mut alice, "alice"), (&mut bob, "bob"), (&mut carol, "carol")] {
        client.send("/enter gameroom").await;
        client
            .read_until(&format!("**enter** [{}] gameroom", name))
            .await;
    }
    alice.send("/ignore bob").await;
    alice.read_until("**ignoring** [alice] bob").await;
    carol.read_until("**ignoring** [alice] bob").await;

    bob.send("is anyone there?").await;
    carol.read_until("[bob] is anyone there?").await;

    alice.expect_reply("/users", "alice, bob, carol").await;

    // Ignoring is one-way
    alice.send("I am").await;
    bob.read_until("[alice] I am").await;
}

#[tokio::test]
async fn private_message_reaches_only_recipient() {
    let addr = start_server().await;
    let mut alice = TestClient::register(addr, "alice").await;
    let mut bob = TestClient::register(addr, "bob").await;
    let mut carol = TestClient::register(addr, "carol").await;

    alice.send("/pm bob psst").await;
    bob.read_until("**pm** [alice] psst").await;

    carol.expect_reply("/users", "alice, bob, carol").await;
    alice.read_until("**connect** [carol]").await;
    alice.expect_reply("/pm dave hi", "no such user dave").await;
}

#[tokio::test]
async fn dropped_connection_leaves_room() {
    let addr = start_server().await;
    let mut alice = TestClient::register(addr, "alice").await;
    let mut bob = TestClient::register(addr, "bob").await;

    alice.send("/enter gameroom").await;
    alice.read_until("**enter** [alice] gameroom").await;
    bob.send("/enter gameroom").await;
    bob.read_until("**enter** [bob] gameroom").await;

    drop(alice);

    bob.read_until("**disconnect** [alice]").await;
    bob.expect_reply("/rooms", "gameroom(1)").await;
}

#[tokio::test]
async fn quit_closes_connection() {
    let addr = start_server().await;
    let mut alice = TestClient::register(addr, "alice").await;
    let mut bob = TestClient::register(addr, "bob").await;

    alice.read_until("**connect** [bob]").await;
    alice.send("/quit").await;
    assert_eq!(alice.next_line().await, None);

    bob.read_until("**disconnect** [alice]").await;

    // The name is free again
    let _alice = TestClient::register(addr, "alice").await;
}

#[tokio::test]
async fn invalid_utf8_keeps_session_alive() {
    let addr = start_server().await;
    let mut alice = TestClient::register(addr, "alice").await;

    alice.send_bytes(b"caf\xe9 au lait\n").await;
    alice.read_until("[alice] caf\u{FFFD} au lait").await;

    alice.expect_reply("/rooms", "no active room").await;
}
