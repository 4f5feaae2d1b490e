// Bot copy. Inline <b>/<br> markup is passed through to the client as-is.
use crate::types::{DocumentCategory, StudentRecord, VerificationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    pub key: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        key: "documentos_requeridos",
        question: "¿Qué documentos necesito para certificar mi etapa productiva?",
        answer: "Necesitas tres documentos: tu <b>documento de identidad</b>, el <b>formato F-023</b> \
                 (acta de inicio de etapa productiva) y la <b>evaluación de etapa productiva</b> \
                 firmada por tu instructor de seguimiento.",
    },
    FaqEntry {
        key: "entrega",
        question: "¿Dónde entrego los documentos que me faltan?",
        answer: "Los documentos faltantes se entregan en la oficina de coordinación académica \
                 o por el correo institucional de tu ficha, en formato PDF.",
    },
    FaqEntry {
        key: "formato_f023",
        question: "¿Qué es el formato F-023?",
        answer: "Es el formato de planeación, seguimiento y evaluación de la etapa productiva. \
                 Lo diligencias con tu instructor de seguimiento al iniciar la etapa.",
    },
    FaqEntry {
        key: "escaneados",
        question: "¿Puedo enviar documentos escaneados o fotos?",
        answer: "Sí. Los documentos escaneados se leen automáticamente, pero deben ser legibles: \
                 tu número de documento y tu nombre completo tienen que verse con claridad.",
    },
];

pub const GREETINGS: &[&str] = &[
    "¡Hola! Soy tu asistente SENA. 👋",
    "¡Qué gusto saludarte! Soy tu asistente SENA. 😊",
    "¡Bienvenido(a)! Estoy aquí para ayudarte con tu etapa productiva.",
];

pub const WELCOME: &str = "Bienvenido(a) al asistente de etapa productiva SENA.";

pub const MAIN_MENU: &str = "¿En qué te puedo ayudar?<br>\
    1️⃣ Verificar el estado de mis documentos<br>\
    2️⃣ Preguntas frecuentes<br>\
    3️⃣ Información sobre la etapa productiva";

pub const MENU_REPROMPT: &str = "No entendí tu respuesta. Elige una opción del menú:";

pub const IDENTITY_PROMPT: &str =
    "Por favor ingresa tu número de documento para verificar tu matrícula y documentos:";

pub const STAGE_INFO: &str = "La <b>etapa productiva</b> es el momento de tu formación en el que aplicas \
    lo aprendido en un entorno real de trabajo. Para certificarla debes tener al día tu documento de \
    identidad, el formato F-023 y la evaluación de etapa productiva.";

pub const NOT_FOUND: &str =
    "❌ No encontramos tu documento en nuestros registros. ¿Estás seguro de estar matriculado en el SENA?";

pub const CONTINUE_PROMPT: &str = "¿Deseas hacer otra consulta? (sí / no)";

pub const CONTINUE_REPROMPT: &str = "Responde <b>sí</b> para volver al menú o <b>no</b> para terminar.";

pub const FAREWELL: &str = "¡Gracias por usar el asistente SENA! Escríbeme cuando necesites algo más. 👋";

pub fn invalid_identity(min_len: usize, max_len: usize) -> String {
    format!(
        "Documento inválido. Debe tener entre {} y {} dígitos. Intenta nuevamente:",
        min_len, max_len
    )
}

pub fn faq_list(intro: &str) -> String {
    let mut text = format!("{}<br>", intro);
    for (index, entry) in FAQ.iter().enumerate() {
        text.push_str(&format!("{}. {}<br>", index + 1, entry.question));
    }
    text.push_str("Escribe el número de la pregunta.");
    text
}

pub fn missing_documents_line(category: DocumentCategory, record: &StudentRecord) -> String {
    match category {
        DocumentCategory::Identity => format!(
            "• Documento ({}): No encontrado en nuestros registros<br>",
            record.document_type
        ),
        DocumentCategory::EnrollmentCertificate => "• F-023: No encontrada en formatos de curso<br>".to_string(),
        DocumentCategory::Evaluation => {
            "• Evaluación: No encontrada en evaluación etapa productiva<br>".to_string()
        }
    }
}

/// Summary shown after a verification run.
pub fn verification_report(record: &StudentRecord, result: &VerificationResult) -> String {
    let mut message = format!(
        "¡Bienvenido(a), <b>{}</b>! Estudiante del programa {} (Ficha {}).<br><br>",
        record.full_name(),
        record.program_name,
        record.cohort
    );

    let missing = result.missing();
    if missing.is_empty() {
        message.push_str("✅ ¡Felicidades! Tienes TODOS tus documentos al día:<br>");
        let labels: Vec<String> = DocumentCategory::ALL.iter().map(|c| format!("• {}", c.label())).collect();
        message.push_str(&labels.join("<br>"));
    } else {
        message.push_str("❌ Documentos faltantes:<br>");
        for category in missing {
            message.push_str(&missing_documents_line(category, record));
        }
        message.push_str("<br>Por favor entrega los documentos faltantes a coordinación.");
    }

    with_continue_prompt(&message)
}

/// Any reply that leaves the dialogue in Final ends by asking whether to go on.
pub fn with_continue_prompt(reply: &str) -> String {
    format!("{}<br><br>{}", reply, CONTINUE_PROMPT)
}
