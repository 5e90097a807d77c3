use conference_ticket::intake::FormView;
use std::io::{self, Write};

pub(crate) fn render_view<W: Write>(view: &FormView, out: &mut W) -> io::Result<()> {
    match &view.ticket {
        Some(ticket) if view.ticket_visible => {
            writeln!(
                out,
                "Congrats, {}! Your ticket is ready.",
                ticket.headline_name
            )?;
            writeln!(
                out,
                "We've emailed your ticket to {} <{}> and will send updates in the run up to the event.",
                ticket.headline_email, ticket.headline_email_href
            )?;
            writeln!(out)?;
            writeln!(out, "Ticket {}", ticket.serial)?;
            writeln!(out, "  {}", ticket.ticket_name)?;
            if let Some(badge) = &ticket.github_badge {
                writeln!(out, "  {}", badge)?;
            }
            match &ticket.avatar_src {
                Some(src) => {
                    let kind = src.split(';').next().unwrap_or(src.as_str());
                    writeln!(out, "  avatar: {} ({} bytes encoded)", kind, src.len())?;
                }
                None => writeln!(out, "  avatar: loading")?,
            }
        }
        _ => {
            writeln!(out, "Ticket not issued.")?;
            if let Some(message) = &view.errors.name {
                writeln!(out, "- Full name: {}", message)?;
            }
            if let Some(message) = &view.errors.email {
                writeln!(out, "- Email: {}", message)?;
            }
            if view.drop_zone.hint.is_error {
                writeln!(out, "- Avatar: {}", view.drop_zone.hint.text)?;
            }
        }
    }

    Ok(())
}

pub(crate) fn render_json<W: Write>(view: &FormView, out: &mut W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, view)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub(crate) fn render_batch_summary<W: Write>(
    issued: usize,
    total: usize,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Issued {issued} of {total} tickets")
}
