// Drive the chat binary through a pty
use rexpect::spawn;
use std::process::Command;
use tempfile::TempDir;

const TIMEOUT_MS: u64 = 10000;
const BIN: &str = env!("CARGO_BIN_EXE_docverify");

// rexpect reads the pty byte by byte, so multi-byte characters never match a
// needle; every needle below stays ASCII.

fn data_args(dir: &TempDir) -> String {
    format!(
        "--database {} --documents {}",
        dir.path().join("database.txt").display(),
        dir.path().join("documentos").display()
    )
}

fn init(dir: &TempDir) {
    let status = Command::new(BIN)
        .args(data_args(dir).split(' '))
        .arg("init")
        .status()
        .expect("Failed to run init");
    assert!(status.success());
}

#[test]
fn test_faq_dialogue() {
    let dir = TempDir::new().unwrap();
    let mut p = spawn(&format!("{} {} chat", BIN, data_args(&dir)), Some(TIMEOUT_MS)).unwrap();

    p.exp_string("escribe 'salir' para terminar").unwrap();
    p.send_line("hola").unwrap();
    p.exp_string("Verificar el estado de mis documentos").unwrap();

    p.send_line("2").unwrap();
    p.exp_string("formato F-023?").unwrap();

    p.send_line("3").unwrap();
    p.exp_string("instructor de seguimiento al iniciar la etapa").unwrap();

    p.send_line("no").unwrap();
    p.exp_string("Gracias por usar el asistente SENA").unwrap();

    p.send_line("salir").unwrap();
    p.exp_eof().unwrap();
}

#[test]
fn test_verification_dialogue_reports_missing_documents() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    assert!(dir.path().join("documentos").join("evaluaciones").is_dir());

    let mut p = spawn(&format!("{} {} chat", BIN, data_args(&dir)), Some(TIMEOUT_MS)).unwrap();
    p.exp_string("escribe 'salir' para terminar").unwrap();

    p.send_line("buenas").unwrap();
    p.send_line("1").unwrap();
    p.exp_string("ingresa tu n").unwrap();

    p.send_line("123").unwrap();
    p.exp_string("Documento inv").unwrap();

    p.send_line("1000000001").unwrap();
    p.exp_string("Ana Lucia Perez Gomez").unwrap();
    p.exp_string("Documentos faltantes").unwrap();
    p.exp_string("Documento (CC)").unwrap();

    p.send_line("salir").unwrap();
    p.exp_eof().unwrap();
}
