//! Admin page renderer
//!
//! Pure function from note content and file-listing markup to the full HTML
//! document. Note content gets minimal escaping (`<` and `>` only) so stored
//! text cannot break out of the editor textarea; the page is only ever viewed
//! by the operator.

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Text Vault</title>
<style>
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,sans-serif;background:#f8fafc;padding:6px}
.container{max-width:980px;margin:0 auto;background:white;border-radius:12px;box-shadow:0 2px 10px rgba(0,0,0,0.08);border:1px solid #e2e8f0}
.header{background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);color:white;padding:16px;text-align:center;border-radius:12px 12px 0 0}
.header h1{margin:0;font-size:1.8em;font-weight:700}
.section{border-bottom:1px solid #e2e8f0}
.section:last-child{border-bottom:none}
.section-header{padding:10px 12px;cursor:pointer;display:flex;justify-content:space-between;align-items:center}
.section-header:hover{background:#f8fafc}
.section-header h3{margin:0;color:#2d3748;font-size:0.95em;display:flex;align-items:center;gap:6px}
.toggle-icon{color:#718096;font-size:0.75em;transition:transform 0.3s}
.section-content{padding:0 12px;max-height:0;overflow:hidden;transition:all 0.3s}
.section-content.expanded{padding:12px;max-height:1000px}
.file-count{font-size:0.7em;color:#718096;background:#edf2f7;padding:2px 6px;border-radius:10px;margin-left:6px}
.file-grid{display:grid;grid-template-columns:1fr 1fr;gap:8px}
.file-item{background:#f7fafc;padding:8px;border-radius:8px;border:1px solid #e2e8f0;display:flex;justify-content:space-between;align-items:flex-start}
.file-item:hover{background:#edf2f7;border-color:#cbd5e0}
.file-main,.file-actions{display:flex;align-items:center}
.file-main{flex:1;gap:4px}
.file-actions{gap:8px;flex-shrink:0}
.file-icon{font-size:1.1em;margin-right:6px}
.file-name{margin-bottom:3px}
.file-name a{text-decoration:none;color:#4a90e2;font-weight:500;font-size:0.85em}
.file-name a:hover{color:#2b6cb0;text-decoration:underline}
.file-meta{font-size:0.7em;color:#718096;display:flex;gap:6px;align-items:center}
.file-size{background:#e2e8f0;padding:1px 4px;border-radius:4px;font-size:0.65em}
.file-time{font-size:0.65em;color:#888;white-space:nowrap}
.file-checkbox{width:16px;height:16px;cursor:pointer}
.file-management-section{margin-top:12px;padding-top:12px;border-top:1px solid #e2e8f0}
.file-management-controls{display:flex;gap:8px;justify-content:space-between;align-items:center;flex-wrap:wrap}
.file-management-controls .btn{flex:1;min-width:120px;justify-content:center}
.selection-info{text-align:center;font-size:0.75em;color:#718096;margin-top:8px}
.editor-container{padding:10px 12px}
.editor-header{display:flex;justify-content:space-between;align-items:center;margin-bottom:8px}
.editor{width:100%;height:160px;border:2px solid #e2e8f0;padding:10px;font-size:13px;resize:vertical;outline:none;font-family:monospace;border-radius:8px;background:#fafbfc}
.editor:focus{border-color:#4a90e2;background:white}
.status{color:#718096;font-size:12px;margin-left:auto}
.share-section{background:#f8fafc;padding:10px;border-radius:8px;margin-top:8px;border:1px solid #e2e8f0}
.share-controls{display:flex;gap:8px;align-items:center;flex-wrap:nowrap}
.share-input{display:flex;gap:6px;align-items:center;flex:1;min-width:0}
.share-input input{flex:1;padding:6px 10px;border:2px solid #e2e8f0;border-radius:6px;font-size:12px;min-width:120px}
.share-input input:focus{border-color:#4a90e2;outline:none}
.action-buttons{display:flex;gap:6px;align-items:center;flex-shrink:0}
.btn{padding:6px 10px;border:2px solid;background:white;border-radius:6px;cursor:pointer;font-size:12px;display:flex;align-items:center;gap:3px;white-space:nowrap}
.btn:hover{transform:translateY(-1px)}
.btn.primary{border-color:#4a90e2;color:#4a90e2}
.btn.primary:hover{background:#4a90e2;color:white}
.btn.success{border-color:#38a169;color:#38a169}
.btn.success:hover{background:#38a169;color:white}
.btn.danger{border-color:#e53e3e;color:#e53e3e}
.btn.danger:hover{background:#e53e3e;color:white}
.btn:disabled{opacity:0.5;cursor:not-allowed;transform:none}
.btn:disabled:hover{background:white;color:inherit}
.link-box{margin-top:8px;display:none}
.link-box input{width:100%;padding:6px 10px;border:2px solid #e2e8f0;border-radius:6px;font-size:12px;background:#f7fafc}
.modal{display:none;position:fixed;top:0;left:0;width:100%;height:100%;background:rgba(0,0,0,0.5);z-index:1000;align-items:center;justify-content:center}
.modal-content{background:white;padding:20px;border-radius:12px;width:90%;max-width:500px;max-height:80vh;overflow:auto}
.modal-header{display:flex;justify-content:space-between;align-items:center;margin-bottom:15px}
.modal-close{background:none;border:none;font-size:1.2em;cursor:pointer}
.modal-body{display:flex;flex-direction:column;gap:10px}
.modal-input,.modal-textarea{width:100%;padding:8px 10px;border:2px solid #e2e8f0;border-radius:8px;font-size:14px}
.modal-input:focus,.modal-textarea:focus{border-color:#4a90e2;outline:none}
.modal-textarea{height:200px;resize:vertical;font-family:monospace}
.modal-footer{display:flex;justify-content:flex-end;gap:10px;margin-top:15px}
@media (max-width:768px){
  .file-grid{grid-template-columns:1fr}
  .file-management-controls{flex-direction:row;gap:6px}
  .file-management-controls .btn{min-width:0;flex:1;font-size:10px;padding:4px 6px}
}
@media (max-width:480px){
  .file-management-controls .btn{font-size:9px;padding:3px 4px}
}
</style>
</head>
<body>
<div class="container">
  <div class="header">
    <h1>Text Vault</h1>
  </div>
"##;

/// Listing section shown when the file list is unavailable (no credential, or
/// the remote store did not answer).
const FALLBACK_LIST_SECTION: &str = r##"<div class="section">
    <div class="section-header" onclick="toggleSection('fileList')">
      <h3>&#128193; Repository files</h3>
      <span class="toggle-icon">&#9660;</span>
    </div>
    <div class="section-content" id="fileList">
      <div style="text-align:center;color:#718096;padding:20px 15px;">File listing unavailable</div>
    </div>
  </div>"##;

const EDITOR_SECTION_OPEN: &str = r##"
  <div class="section">
    <div class="section-header" onclick="toggleSection('notepad')">
      <h3>&#128221; Notepad</h3>
      <span class="toggle-icon">&#9660;</span>
    </div>
    <div class="section-content expanded" id="notepad">
      <div class="editor-container">
        <div class="editor-header">
          <h3 class="editor-title">Text editor</h3>
          <div class="status" id="status">Ready</div>
        </div>
        <textarea class="editor" id="editor" placeholder="Start typing... changes save automatically">"##;

const EDITOR_SECTION_CLOSE: &str = r##"</textarea>
        <div class="share-section">
          <div class="share-controls">
            <div class="share-input">
              <input type="text" id="tokenInput" placeholder="Share password (optional)">
              <button class="btn primary" onclick="generateLink()">&#128279; Share link</button>
            </div>
            <div class="action-buttons">
              <button class="btn success" onclick="copyEditorContent()">&#128203; Copy text</button>
            </div>
          </div>
          <div class="link-box" id="linkBox">
            <input type="text" id="link" readonly placeholder="The share link will appear here...">
          </div>
        </div>
      </div>
    </div>
  </div>
</div>
<div class="modal" id="fileModal">
  <div class="modal-content">
    <div class="modal-header">
      <h3 class="modal-title" id="modalTitle">Edit file</h3>
      <button class="modal-close" onclick="closeModal()">&times;</button>
    </div>
    <div class="modal-body">
      <input type="text" class="modal-input" id="fileName" placeholder="File name">
      <textarea class="modal-textarea" id="fileContent" placeholder="File content"></textarea>
    </div>
    <div class="modal-footer">
      <button class="btn danger" onclick="closeModal()">Cancel</button>
      <button class="btn primary" id="modalActionBtn" onclick="handleFileAction()">Save</button>
    </div>
  </div>
</div>
"##;

/// Browser-side behavior: section toggling, debounced auto-save, share-link
/// generation, file create/update modal, and the paced multi-delete loop.
const PAGE_SCRIPT: &str = r##"<script>
let currentAction = '', currentSha = '';
let selectedFiles = new Map();

function toggleSection(sectionId) {
  const section = document.getElementById(sectionId);
  const icon = section.previousElementSibling.querySelector('.toggle-icon');
  if (section.classList.contains('expanded')) {
    section.classList.remove('expanded');
    icon.style.transform = 'rotate(0deg)';
  } else {
    section.classList.add('expanded');
    icon.style.transform = 'rotate(180deg)';
  }
}
document.addEventListener('DOMContentLoaded', function() {
  const notepadSection = document.getElementById('notepad');
  const notepadIcon = notepadSection.previousElementSibling.querySelector('.toggle-icon');
  notepadSection.classList.add('expanded');
  notepadIcon.style.transform = 'rotate(180deg)';
  const urlParams = new URLSearchParams(window.location.search);
  if (urlParams.get('expand') === 'fileList') {
    toggleSection('fileList');
    const url = new URL(window.location);
    url.searchParams.delete('expand');
    window.history.replaceState({}, '', url);
  }
});

function updateSelection() {
  selectedFiles.clear();
  const checkboxes = document.querySelectorAll('.file-checkbox:checked');
  checkboxes.forEach(checkbox => selectedFiles.set(checkbox.dataset.filename, checkbox.dataset.sha));

  const editBtn = document.querySelector('.edit-btn');
  const deleteBtn = document.querySelector('.delete-btn');
  const selectionInfo = document.getElementById('selectionInfo');

  if (checkboxes.length === 0) {
    editBtn.disabled = deleteBtn.disabled = true;
    selectionInfo.textContent = 'No files selected';
  } else if (checkboxes.length === 1) {
    editBtn.disabled = deleteBtn.disabled = false;
    selectionInfo.textContent = '1 file selected: ' + checkboxes[0].dataset.filename;
  } else {
    editBtn.disabled = true;
    deleteBtn.disabled = false;
    selectionInfo.textContent = checkboxes.length + ' files selected';
  }
}

function editSelectedFile() {
  if (selectedFiles.size !== 1) return showStatus('Select exactly one file to edit');
  const [[filename, sha]] = selectedFiles.entries();
  fetch('/' + filename).then(r => r.text()).then(content => {
    document.getElementById('fileName').value = filename;
    document.getElementById('fileContent').value = content;
    document.getElementById('modalTitle').textContent = 'Edit file';
    document.getElementById('modalActionBtn').textContent = 'Update file';
    currentAction = 'update';
    currentSha = sha;
    document.getElementById('fileModal').style.display = 'flex';
  }).catch(() => showStatus('Failed to load file content'));
}

async function deleteSelectedFiles() {
  if (selectedFiles.size === 0) return showStatus('Select files to delete');
  const fileList = Array.from(selectedFiles.keys()).join(', ');
  if (!confirm('Delete these ' + selectedFiles.size + ' file(s)? The change is pushed to the repository.\n\n' + fileList)) return;

  const deleteBtn = document.querySelector('.delete-btn');
  const originalText = deleteBtn.innerHTML;
  deleteBtn.disabled = true;
  deleteBtn.innerHTML = 'Deleting...';

  try {
    let successCount = 0;
    for (const [filename, sha] of selectedFiles.entries()) {
      try {
        showStatus('Deleting: ' + filename);
        const response = await fetch('', { method: 'POST', body: 'github:' + JSON.stringify({ action: 'delete', filename, sha }) });
        const result = await response.json();
        if (!result.error) successCount++;
        // Pace sequential deletes to stay under the remote API's abuse limits.
        await new Promise(resolve => setTimeout(resolve, 500));
      } catch (error) {
        console.error('Delete failed:', filename, error);
      }
    }
    showStatus(successCount === selectedFiles.size ? 'Deleted ' + successCount + ' file(s)' : 'Deleted ' + successCount + ' file(s), ' + (selectedFiles.size - successCount) + ' failed');
    reloadWithExpand();
  } catch (error) {
    showStatus('Delete run failed: ' + error.message);
  } finally {
    deleteBtn.disabled = false;
    deleteBtn.innerHTML = originalText;
  }
}

function copyEditorContent() {
  const content = document.getElementById('editor').value;
  if (!content.trim()) return showStatus('Nothing to copy');
  const btn = event.target.closest('.btn');
  const originalText = btn.innerHTML;
  btn.disabled = true;
  btn.innerHTML = 'Copying...';
  copyToClipboard(content).then(() => showStatus('Copied to clipboard'))
    .catch(() => {
      document.getElementById('editor').select();
      try { document.execCommand('copy'); showStatus('Copied to clipboard'); }
      catch (err) { showStatus('Copy failed, copy manually'); }
    }).finally(() => { btn.disabled = false; btn.innerHTML = originalText; });
}
function copyToClipboard(text) {
  if (navigator.clipboard && window.isSecureContext) return navigator.clipboard.writeText(text);
  const textArea = document.createElement('textarea');
  textArea.value = text;
  textArea.style.position = 'fixed';
  textArea.style.left = textArea.style.top = '-999999px';
  document.body.appendChild(textArea);
  textArea.focus();
  textArea.select();
  return new Promise((resolve, reject) => {
    try { document.execCommand('copy'); resolve(); }
    catch (err) { reject(err); }
    finally { document.body.removeChild(textArea); }
  });
}
function generateLink() {
  const userToken = document.getElementById('tokenInput').value;
  const btn = event.target.closest('.btn');
  const originalText = btn.innerHTML;
  btn.disabled = true;
  btn.innerHTML = 'Working...';
  fetch('', { method: 'POST', body: 'token:' + userToken })
    .then(response => response.text())
    .then(token => {
      const link = location.origin + '/s?token=' + token;
      document.getElementById('linkBox').style.display = 'block';
      document.getElementById('link').value = link;
      copyToClipboard(link).then(() => showStatus('Share link copied to clipboard'))
        .catch(() => { document.getElementById('link').select(); showStatus('Link ready, copy it manually'); });
    }).catch(() => showStatus('Failed to generate link'))
    .finally(() => { btn.disabled = false; btn.innerHTML = originalText; });
}
function showStatus(msg) {
  const statusEl = document.getElementById('status');
  statusEl.textContent = msg;
  setTimeout(() => statusEl.textContent = 'Ready', 3000);
}
let timer;
document.getElementById('editor').addEventListener('input', () => {
  clearTimeout(timer);
  timer = setTimeout(() => {
    const content = document.getElementById('editor').value;
    fetch('', { method: 'POST', body: content })
      .then(() => showStatus('Saved'))
      .catch(() => showStatus('Auto-save failed'));
  }, 1000);
});
document.addEventListener('keydown', e => {
  if ((e.ctrlKey || e.metaKey) && e.key === 's') {
    e.preventDefault();
    showStatus('Saved');
  }
});
function createFile() {
  document.getElementById('fileName').value = '';
  document.getElementById('fileContent').value = '';
  document.getElementById('modalTitle').textContent = 'Create file';
  document.getElementById('modalActionBtn').textContent = 'Create file';
  currentAction = 'create';
  currentSha = '';
  document.getElementById('fileModal').style.display = 'flex';
}
function closeModal() {
  document.getElementById('fileModal').style.display = 'none';
}
function handleFileAction() {
  const filename = document.getElementById('fileName').value.trim();
  const content = document.getElementById('fileContent').value;
  if (!filename) return alert('Enter a file name');
  showStatus('Working...');
  const data = { action: currentAction, filename, content };
  if (currentAction === 'update') data.sha = currentSha;
  fetch('', { method: 'POST', body: 'github:' + JSON.stringify(data) })
    .then(response => response.json())
    .then(result => {
      if (result.error) showStatus('Action failed: ' + result.error);
      else { showStatus(currentAction === 'create' ? 'File created' : 'File updated'); closeModal(); reloadWithExpand(); }
    }).catch(() => showStatus('Action failed'));
}
function reloadWithExpand() {
  const url = new URL(window.location);
  url.searchParams.set('expand', 'fileList');
  window.location.href = url.toString();
}
document.getElementById('fileModal').addEventListener('click', function(e) {
  if (e.target === this) closeModal();
});
</script>
</body>
</html>"##;

/// Composes the full admin document around the stored note and the listing
/// markup produced by `render_file_list`.
pub fn render_admin_page(note: &str, file_list_html: &str) -> String {
    let listing = if file_list_html.is_empty() {
        FALLBACK_LIST_SECTION
    } else {
        file_list_html
    };

    let escaped = escape_note(note);
    let mut page = String::with_capacity(
        PAGE_HEAD.len()
            + listing.len()
            + EDITOR_SECTION_OPEN.len()
            + escaped.len()
            + EDITOR_SECTION_CLOSE.len()
            + PAGE_SCRIPT.len(),
    );
    page.push_str(PAGE_HEAD);
    page.push_str(listing);
    page.push_str(EDITOR_SECTION_OPEN);
    page.push_str(&escaped);
    page.push_str(EDITOR_SECTION_CLOSE);
    page.push_str(PAGE_SCRIPT);
    page
}

/// Minimal escaping: enough to keep stored text from closing the textarea.
fn escape_note(content: &str) -> String {
    content.replace('<', "&lt;").replace('>', "&gt;")
}
