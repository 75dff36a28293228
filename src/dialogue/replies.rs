//! Scripted reply texts.

/// Every message the assistant can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    /// Service 1–5 chosen.
    RequestAcknowledged,
    /// Accessibility sub-flow finished or declined.
    InformationAcknowledged,
    ChooseMenu,
    DisabilityIntro,
    AskYesNo,
    AskDisabilityType,
    AskAdditionalService,
    AskAccessibility,
    FinishPreviousStep,
}

// Menu lines keep their trailing double space.
const WELCOME: &str = "Halo! Terima kasih telah menghubungi *Balai Besar Pelaksanaan Jalan Nasional Jawa Tengah – DI Yogyakarta*. 🙏\n\
\n\
Silakan pilih layanan berikut dengan membalas angka:\n\
\n\
1️⃣ Permohonan Informasi Publik  \n\
2️⃣ Peminjaman Alat Konstruksi dengan Cara Sewa  \n\
3️⃣ Perizinan Pemanfaatan Bagian-Bagian Jalan Nasional  \n\
4️⃣ Sertifikasi AMP  \n\
5️⃣ Permohonan Kerja Praktik / Magang  \n\
6️⃣ Layanan untuk Penyandang Disabilitas dan Kelompok Rentan\n\
\n\
Terima kasih.";

const REQUEST_ACKNOWLEDGED: &str = "✅ *Terima kasih!* Permintaan Anda akan segera ditindaklanjuti oleh petugas kami.

Ketik *0* jika ingin kembali ke menu layanan.";

const INFORMATION_ACKNOWLEDGED: &str = "✅ *Terima kasih!* Informasi Anda akan segera ditindaklanjuti oleh petugas kami.

Ketik *0* jika ingin kembali ke menu layanan.";

const DISABILITY_INTRO: &str = "Terima kasih telah memilih *Layanan untuk Penyandang Disabilitas dan Kelompok Rentan*. 🙏\n\
\n\
Apakah Anda penyandang disabilitas atau memiliki kebutuhan khusus?  \n\
Balas: *Ya* / *Tidak*";

impl Reply {
    pub fn text(self) -> &'static str {
        match self {
            Self::Welcome => WELCOME,
            Self::RequestAcknowledged => REQUEST_ACKNOWLEDGED,
            Self::InformationAcknowledged => INFORMATION_ACKNOWLEDGED,
            Self::ChooseMenu => "Mohon pilih salah satu layanan dengan angka 1 hingga 6. 🙏",
            Self::DisabilityIntro => DISABILITY_INTRO,
            Self::AskYesNo => {
                "Mohon balas dengan *Ya* atau *Tidak* agar kami bisa lanjut membantu. 🙏"
            }
            Self::AskDisabilityType => {
                "• Jenis disabilitas atau kebutuhan khusus yang Anda miliki:"
            }
            Self::AskAdditionalService => {
                "• Apakah Anda membutuhkan layanan tambahan? (misalnya, penerjemah bahasa isyarat):"
            }
            Self::AskAccessibility => {
                "• Apakah ada aksesibilitas lain yang diperlukan untuk konsultasi?:"
            }
            Self::FinishPreviousStep => {
                "Mohon selesaikan proses sebelumnya sebelum mengirim pesan baru. 🙏"
            }
        }
    }
}
