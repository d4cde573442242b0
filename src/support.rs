//! Help content and the contact form.

use serde::Serialize;
use validator::Validate;

use crate::api::{ApiError, ContactRequest};
use crate::core::state::ClientState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: &[Faq] = &[
    Faq {
        question: "What is EduConnect all about?",
        answer: "EduConnect is an educational platform designed to connect teachers and students for virtual after-school classes.",
    },
    Faq {
        question: "Who does EduConnect deal with?",
        answer: "EduConnect exclusively serves parents or guardians aged 18 and over who wish to register their children for online after-school classes. Parents are advised to supervise their children during learning periods.",
    },
    Faq {
        question: "What student age is appropriate to register your ward for EduConnect?",
        answer: "EduConnect does not impose an age limit for students. However, all students must be of school-going age and currently enrolled in one of the classes available on our platform.",
    },
    Faq {
        question: "Is EduConnect a safe space for children?",
        answer: "EduConnect strictly prohibits the sharing of personal information on any platform. Teachers are screened thoroughly and teacher-student chats are monitored and recorded to ensure safety.",
    },
    Faq {
        question: "Who do I contact if I have any issues regarding payments?",
        answer: "If you experience any payment issues, please use the contact form to reach our team. We will respond via email within two business days. Note: EduConnect will never ask for your personal information via phone or email.",
    },
    Faq {
        question: "If I forget my password, how do I recover my account?",
        answer: "You can reset your password with the \"Forgot Password\" option on the login page.",
    },
    Faq {
        question: "What are some of the subjects treated by EduConnect?",
        answer: "EduConnect currently offers two curricula: Cambridge and GES. Visit the main page for the full list of subjects available for registration.",
    },
    Faq {
        question: "What grades are acceptable on EduConnect?",
        answer: "Cambridge Curriculum: Stage 4-13 (including IGCSE & A-Level prep). GES Curriculum: Basic 4-SSS4 (including BECE, WASSCE & Remedial prep).",
    },
    Faq {
        question: "Why EduConnect?",
        answer: "EduConnect allows teachers to focus solely on teaching, ensures parents can monitor academic progress, and provides a safe and tech-savvy learning environment for students.",
    },
    Faq {
        question: "What are the available packages run under EduConnect?",
        answer: "EduConnect offers After-School Classes, Vacation Classes, One-on-One Sessions, Weekend Tutoring, Remedial, and Special Classes. Visit our main page for more details.",
    },
    Faq {
        question: "What is the duration period for a chosen package?",
        answer: "Each package has a specific duration. Check the main page for details about your chosen package.",
    },
    Faq {
        question: "Can a student register for more than one package?",
        answer: "Yes, but we recommend focusing on one package at a time for best results.",
    },
    Faq {
        question: "How do I renew my package?",
        answer: "You can renew your package from the payment page on your student dashboard.",
    },
    Faq {
        question: "Can I add a new subject to my existing package?",
        answer: "Yes, you can add a new subject by revisiting your payment page on your dashboard.",
    },
    Faq {
        question: "Can I switch packages?",
        answer: "You can switch packages only when re-registering, not during an active package.",
    },
    Faq {
        question: "Can I remove a subject from my package when re-registering?",
        answer: "Yes, you can remove a subject when re-registering via the payments page.",
    },
];

/// Case-insensitive substring search over questions and answers.
pub fn search_faqs(query: &str) -> Vec<Faq> {
    let needle = query.trim().to_lowercase();
    FAQS.iter()
        .filter(|faq| {
            needle.is_empty()
                || faq.question.to_lowercase().contains(&needle)
                || faq.answer.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

pub async fn send_contact(client: &ClientState, form: ContactForm) -> Result<String, ApiError> {
    let form = ContactForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        message: form.message.trim().to_string(),
    };
    form.validate()?;

    let request = ContactRequest { name: form.name, email: form.email, message: form.message };
    let message = client.api().contact(&request).await?;
    Ok(message.unwrap_or_else(|| "Message sent successfully!".to_string()))
}
